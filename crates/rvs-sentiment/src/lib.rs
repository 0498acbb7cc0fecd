//! Lexicon-based sentiment scoring for short review texts.
//!
//! Text is tokenized, each token (or multi-word idiom) is looked up in a
//! versioned polarity lexicon, and composition rules adjust the raw valences
//! for negation, degree words, shouting, punctuation emphasis and contrastive
//! conjunctions. The result is a [`SentimentProfile`] whose `compound` lies
//! in `[-1, 1]`.

pub mod error;
pub mod lexicon;
pub mod scorer;
pub mod types;

pub use error::LexiconError;
pub use lexicon::Lexicon;
pub use scorer::{LexiconScorer, SentimentScorer};
pub use types::SentimentProfile;
