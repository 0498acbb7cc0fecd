//! Filter, score and rank reviews.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rvs_core::{LocationSet, Review};
use rvs_sentiment::{SentimentProfile, SentimentScorer};
use serde::Serialize;

use crate::store::ReviewStore;

/// Date format accepted for query bounds.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A review with its sentiment computed for this query only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredReview {
    #[serde(flatten)]
    pub review: Review,
    pub sentiment: SentimentProfile,
}

/// Query constraints. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewQuery {
    pub location: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Parse a `YYYY-MM-DD` bound as midnight of that day.
///
/// Returns `None` for anything unparsable; callers treat that as "no bound".
#[must_use]
pub fn parse_date_bound(raw: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

impl ReviewQuery {
    /// Build a query from raw request parameters.
    ///
    /// An empty location means "no location filter". Malformed dates are
    /// ignored rather than rejected, and an end date without a time of day
    /// means midnight, so reviews later that day fall outside it.
    #[must_use]
    pub fn from_params(
        location: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Self {
        let start = start_date.and_then(parse_date_bound);
        let end = end_date.and_then(parse_date_bound);
        if (start_date.is_some() && start.is_none()) || (end_date.is_some() && end.is_none()) {
            tracing::debug!(?start_date, ?end_date, "ignoring malformed date bound");
        }
        Self {
            location: location.filter(|l| !l.is_empty()).map(str::to_string),
            start,
            end,
        }
    }

    fn admits(&self, review: &Review, allowed: &LocationSet) -> bool {
        let location_ok = match &self.location {
            Some(location) => review.location == *location,
            None => allowed.contains(&review.location),
        };
        location_ok
            && self.start.is_none_or(|start| review.timestamp >= start)
            && self.end.is_none_or(|end| review.timestamp <= end)
    }
}

/// Read-side engine combining the store with a sentiment scorer.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<ReviewStore>,
    scorer: Arc<dyn SentimentScorer>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("store", &self.store)
            .field("scorer", &"dyn SentimentScorer")
            .finish()
    }
}

impl QueryEngine {
    #[must_use]
    pub fn new(store: Arc<ReviewStore>, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { store, scorer }
    }

    /// Reviews matching `query`, scored and sorted by compound score
    /// descending. Equal scores keep insertion order.
    #[must_use]
    pub fn filter(&self, query: &ReviewQuery) -> Vec<ScoredReview> {
        let allowed = self.store.locations();
        let mut scored: Vec<ScoredReview> = self
            .store
            .snapshot()
            .iter()
            .filter(|review| query.admits(review, allowed))
            .map(|review| ScoredReview {
                sentiment: self.scorer.score(&review.body),
                review: Review::clone(review),
            })
            .collect();

        // `sort_by` is stable.
        scored.sort_by(|a, b| {
            b.sentiment
                .compound
                .partial_cmp(&a.sentiment.compound)
                .unwrap_or(Ordering::Equal)
        });

        tracing::debug!(
            location = ?query.location,
            results = scored.len(),
            "review query evaluated"
        );
        scored
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rvs_core::parse_timestamp;
    use rvs_sentiment::LexiconScorer;

    use super::*;

    /// Scores each body by a fixed table so ranking can be tested exactly.
    struct TableScorer(HashMap<&'static str, f64>);

    impl SentimentScorer for TableScorer {
        fn score(&self, text: &str) -> SentimentProfile {
            let compound = self.0.get(text).copied().unwrap_or(0.0);
            SentimentProfile {
                compound,
                ..SentimentProfile::NEUTRAL
            }
        }
    }

    fn review(id: &str, location: &str, timestamp: &str, body: &str) -> Review {
        Review {
            id: Some(id.to_string()),
            body: body.to_string(),
            location: location.to_string(),
            timestamp: parse_timestamp(timestamp).expect("timestamp"),
        }
    }

    fn engine_with(reviews: Vec<Review>, table: &[(&'static str, f64)]) -> QueryEngine {
        let store = Arc::new(ReviewStore::default());
        store.load_initial(reviews).expect("seed");
        QueryEngine::new(store, Arc::new(TableScorer(table.iter().copied().collect())))
    }

    fn ids(results: &[ScoredReview]) -> Vec<&str> {
        results
            .iter()
            .map(|r| r.review.id.as_deref().unwrap_or(""))
            .collect()
    }

    #[test]
    fn ranks_by_compound_descending() {
        let engine = engine_with(
            vec![
                review("a", "Denver, Colorado", "2021-01-01 10:00:00", "great"),
                review("b", "Denver, Colorado", "2021-01-02 10:00:00", "awful"),
                review("c", "Denver, Colorado", "2021-01-03 10:00:00", "meh"),
            ],
            &[("great", 0.8), ("awful", -0.5), ("meh", 0.1)],
        );
        let results = engine.filter(&ReviewQuery::from_params(
            Some("Denver, Colorado"),
            None,
            None,
        ));
        let scores: Vec<f64> = results.iter().map(|r| r.sentiment.compound).collect();
        assert_eq!(scores, vec![0.8, 0.1, -0.5]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let engine = engine_with(
            vec![
                review("first", "Fresno, California", "2021-01-01 10:00:00", "same"),
                review("top", "Fresno, California", "2021-01-01 11:00:00", "best"),
                review("second", "Fresno, California", "2021-01-01 12:00:00", "same"),
                review("third", "Fresno, California", "2021-01-01 13:00:00", "same"),
            ],
            &[("same", 0.3), ("best", 0.9)],
        );
        let results = engine.filter(&ReviewQuery::default());
        assert_eq!(ids(&results), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn location_filter_is_exact() {
        let engine = engine_with(
            vec![
                review("a", "Denver, Colorado", "2021-01-01 10:00:00", "x"),
                review("b", "denver, colorado", "2021-01-01 10:00:00", "x"),
                review("c", "Tucson, Arizona", "2021-01-01 10:00:00", "x"),
            ],
            &[],
        );
        let results = engine.filter(&ReviewQuery::from_params(
            Some("Denver, Colorado"),
            None,
            None,
        ));
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn explicit_location_may_be_outside_allowed_set() {
        let engine = engine_with(
            vec![review("old", "Atlantis", "2019-01-01 10:00:00", "x")],
            &[],
        );
        let results = engine.filter(&ReviewQuery::from_params(Some("Atlantis"), None, None));
        assert_eq!(ids(&results), vec!["old"]);
    }

    #[test]
    fn unfiltered_view_excludes_unknown_locations() {
        let engine = engine_with(
            vec![
                review("ok", "El Paso, Texas", "2021-01-01 10:00:00", "x"),
                review("stale", "Atlantis", "2021-01-01 10:00:00", "x"),
            ],
            &[],
        );
        let results = engine.filter(&ReviewQuery::from_params(Some(""), None, None));
        assert_eq!(ids(&results), vec!["ok"]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let engine = engine_with(
            vec![
                review("before", "Denver, Colorado", "2021-01-31 23:59:59", "x"),
                review("on-start", "Denver, Colorado", "2021-02-01 00:00:00", "x"),
                review("inside", "Denver, Colorado", "2021-02-10 08:30:00", "x"),
                review("on-end", "Denver, Colorado", "2021-02-28 00:00:00", "x"),
                review("after", "Denver, Colorado", "2021-03-01 00:00:00", "x"),
            ],
            &[],
        );
        let results = engine.filter(&ReviewQuery::from_params(
            None,
            Some("2021-02-01"),
            Some("2021-02-28"),
        ));
        assert_eq!(ids(&results), vec!["on-start", "inside", "on-end"]);
    }

    #[test]
    fn end_date_means_midnight() {
        let engine = engine_with(
            vec![
                review("midnight", "Denver, Colorado", "2021-02-28 00:00:00", "x"),
                review("same-day", "Denver, Colorado", "2021-02-28 00:00:01", "x"),
            ],
            &[],
        );
        let results = engine.filter(&ReviewQuery::from_params(None, None, Some("2021-02-28")));
        assert_eq!(ids(&results), vec!["midnight"]);
    }

    #[test]
    fn malformed_dates_are_ignored() {
        let query = ReviewQuery::from_params(None, Some("02/01/2021"), Some("not-a-date"));
        assert_eq!(query, ReviewQuery::default());

        let engine = engine_with(
            vec![review("a", "Denver, Colorado", "1999-01-01 00:00:00", "x")],
            &[],
        );
        assert_eq!(engine.filter(&query).len(), 1);
    }

    #[test]
    fn parse_date_bound_is_midnight() {
        let bound = parse_date_bound("2022-07-04").expect("valid");
        assert_eq!(bound, parse_timestamp("2022-07-04 00:00:00").unwrap());
        assert!(parse_date_bound("2022-13-40").is_none());
        assert!(parse_date_bound("").is_none());
    }

    #[test]
    fn empty_store_yields_empty_result() {
        let engine = engine_with(vec![], &[]);
        assert!(engine.filter(&ReviewQuery::default()).is_empty());
    }

    #[test]
    fn appended_review_is_visible_to_queries() {
        let store = Arc::new(ReviewStore::default());
        let engine = QueryEngine::new(Arc::clone(&store), Arc::new(LexiconScorer::default()));
        let added = store
            .append("Las Vegas, Nevada", "Loved the buffet")
            .expect("append");

        let unfiltered = engine.filter(&ReviewQuery::default());
        assert_eq!(unfiltered.len(), 1);
        assert_eq!(unfiltered[0].review, added);

        let filtered = engine.filter(&ReviewQuery::from_params(
            Some("Las Vegas, Nevada"),
            None,
            None,
        ));
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].sentiment.compound > 0.0);
    }

    #[test]
    fn results_serialize_flat_with_sentiment() {
        let engine = engine_with(
            vec![review("a", "Denver, Colorado", "2021-01-01 10:00:00", "x")],
            &[("x", 0.5)],
        );
        let json = serde_json::to_value(engine.filter(&ReviewQuery::default())).expect("json");
        let first = &json[0];
        assert_eq!(first["ReviewId"], "a");
        assert_eq!(first["Timestamp"], "2021-01-01 10:00:00");
        assert_eq!(first["sentiment"]["compound"], 0.5);
        assert_eq!(first["sentiment"]["neu"], 1.0);
    }

    #[test]
    fn results_are_sorted_with_real_scorer() {
        let store = Arc::new(ReviewStore::default());
        let engine = QueryEngine::new(Arc::clone(&store), Arc::new(LexiconScorer::default()));
        for body in [
            "It was fine",
            "Terrible service, cold food",
            "Absolutely wonderful evening!",
            "Not great, not awful",
            "The best tacos in town",
        ] {
            store.append("Oceanside, California", body).expect("append");
        }
        let results = engine.filter(&ReviewQuery::default());
        assert_eq!(results.len(), 5);
        for pair in results.windows(2) {
            assert!(pair[0].sentiment.compound >= pair[1].sentiment.compound);
        }
    }
}
