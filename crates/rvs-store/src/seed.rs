//! Bulk loading of preloaded reviews from CSV.

use std::io::Read;
use std::path::Path;

use rvs_core::{parse_timestamp, Review};
use serde::Deserialize;

use crate::error::SeedError;

#[derive(Debug, Deserialize)]
struct SeedRecord {
    #[serde(rename = "ReviewId", default)]
    id: Option<String>,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "ReviewBody")]
    body: String,
}

/// Load reviews from a CSV file with a `ReviewId,Location,Timestamp,ReviewBody`
/// header (`ReviewId` optional, extra columns ignored).
///
/// # Errors
///
/// Returns [`SeedError`] if the file cannot be opened or any row is malformed.
pub fn load_reviews_csv(path: &Path) -> Result<Vec<Review>, SeedError> {
    let file = std::fs::File::open(path).map_err(|e| SeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let reviews = read_reviews_csv(file)?;
    tracing::info!(path = %path.display(), count = reviews.len(), "loaded seed reviews");
    Ok(reviews)
}

/// Parse seed reviews from any CSV reader.
///
/// # Errors
///
/// Returns [`SeedError`] on the first malformed row; row numbers count the
/// header as row 1.
pub fn read_reviews_csv<R: Read>(reader: R) -> Result<Vec<Review>, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut reviews = Vec::new();

    for (idx, record) in csv_reader.deserialize::<SeedRecord>().enumerate() {
        let row = idx + 2;
        let record = record?;
        if record.body.is_empty() {
            return Err(SeedError::EmptyBody { row });
        }
        let timestamp =
            parse_timestamp(&record.timestamp).map_err(|source| SeedError::Timestamp { row, source })?;
        reviews.push(Review {
            id: record.id.filter(|id| !id.trim().is_empty()),
            body: record.body,
            location: record.location,
            timestamp,
        });
    }

    Ok(reviews)
}
