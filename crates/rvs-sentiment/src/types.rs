use serde::{Deserialize, Serialize};

/// Four-way sentiment breakdown of one text.
///
/// `negative + neutral + positive == 1.0` (up to float rounding) and
/// `compound` is in `[-1.0, 1.0]`. Serialized with the short keys
/// `neg`, `neu`, `pos`, `compound`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentProfile {
    #[serde(rename = "neg")]
    pub negative: f64,
    #[serde(rename = "neu")]
    pub neutral: f64,
    #[serde(rename = "pos")]
    pub positive: f64,
    pub compound: f64,
}

impl SentimentProfile {
    /// Profile of text with nothing to score.
    pub const NEUTRAL: Self = Self {
        negative: 0.0,
        neutral: 1.0,
        positive: 0.0,
        compound: 0.0,
    };
}

impl Default for SentimentProfile {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_short_keys() {
        let profile = SentimentProfile {
            negative: 0.1,
            neutral: 0.6,
            positive: 0.3,
            compound: 0.42,
        };
        let json = serde_json::to_value(profile).expect("serialize");
        assert_eq!(json["neg"], 0.1);
        assert_eq!(json["neu"], 0.6);
        assert_eq!(json["pos"], 0.3);
        assert_eq!(json["compound"], 0.42);
    }
}
