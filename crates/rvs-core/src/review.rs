use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::TimestampError;

/// Wire and storage format for review timestamps (second precision, no zone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One customer review.
///
/// Field names on the wire match the original data set (`ReviewId`,
/// `ReviewBody`, `Location`, `Timestamp`). Preloaded reviews may lack an id;
/// the field is omitted from JSON in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(
        rename = "ReviewId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(rename = "ReviewBody")]
    pub body: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Timestamp", with = "timestamp_serde")]
    pub timestamp: NaiveDateTime,
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// # Errors
///
/// Returns [`TimestampError`] if the value does not match [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|source| {
        TimestampError {
            value: value.to_string(),
            source,
        }
    })
}

#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

mod timestamp_serde {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Review {
        Review {
            id: Some("abc-123".to_string()),
            body: "Great tacos".to_string(),
            location: "Denver, Colorado".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2021, 3, 4)
                .unwrap()
                .and_hms_opt(5, 6, 7)
                .unwrap(),
        }
    }

    #[test]
    fn serializes_with_original_field_names() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["ReviewId"], "abc-123");
        assert_eq!(json["ReviewBody"], "Great tacos");
        assert_eq!(json["Location"], "Denver, Colorado");
        assert_eq!(json["Timestamp"], "2021-03-04 05:06:07");
    }

    #[test]
    fn missing_id_is_omitted() {
        let mut review = sample();
        review.id = None;
        let json = serde_json::to_string(&review).expect("serialize");
        assert!(!json.contains("ReviewId"), "unexpected id in {json}");
    }

    #[test]
    fn deserializes_without_id() {
        let review: Review = serde_json::from_str(
            r#"{"ReviewBody":"ok","Location":"Fresno, California","Timestamp":"2020-01-01 00:00:00"}"#,
        )
        .expect("deserialize");
        assert!(review.id.is_none());
        assert_eq!(format_timestamp(&review.timestamp), "2020-01-01 00:00:00");
    }

    #[test]
    fn parse_timestamp_rejects_date_only() {
        let err = parse_timestamp("2020-01-01").unwrap_err();
        assert_eq!(err.value, "2020-01-01");
    }

    #[test]
    fn rejects_malformed_timestamp_in_json() {
        let result: Result<Review, _> = serde_json::from_str(
            r#"{"ReviewBody":"ok","Location":"x","Timestamp":"yesterday"}"#,
        );
        assert!(result.is_err());
    }
}
