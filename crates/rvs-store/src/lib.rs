//! In-memory review store, CSV seeding and the filter/score/rank query engine.

pub mod error;
pub mod query;
pub mod seed;
pub mod store;

pub use error::{SeedError, StoreError, ValidationError};
pub use query::{parse_date_bound, QueryEngine, ReviewQuery, ScoredReview};
pub use seed::{load_reviews_csv, read_reviews_csv};
pub use store::ReviewStore;
