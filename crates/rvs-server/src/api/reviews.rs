use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    Extension, Json,
};
use rvs_core::Review;
use rvs_store::{ReviewQuery, ScoredReview};

use crate::middleware::RequestId;

use super::{ApiError, AppState, EMPTY_BODY, INVALID_FORMAT, REQUIRED_FIELDS};

/// Decoded `key=value` pairs from a query string or form body.
///
/// Blank values are dropped, so `Location=` reads the same as no `Location`.
struct FormFields(Vec<(String, String)>);

impl FormFields {
    fn parse(raw: &str) -> Self {
        Self(
            url::form_urlencoded::parse(raw.as_bytes())
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        )
    }

    /// First value for `key`; later repeats are ignored.
    fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// `GET /?location=&start_date=&end_date=`: matching reviews ranked by sentiment.
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<ScoredReview>>, ApiError> {
    let params = FormFields::parse(raw.as_deref().unwrap_or_default());
    let query = ReviewQuery::from_params(
        params.first("location"),
        params.first("start_date"),
        params.first("end_date"),
    );

    let engine = state.engine.clone();
    let results = tokio::task::spawn_blocking(move || engine.filter(&query))
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "review query task failed");
            ApiError::internal("review query failed")
        })?;

    Ok(Json(results))
}

/// `POST /` with a form-encoded `Location` and `ReviewBody`.
pub(super) async fn submit_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    if body.is_empty() {
        tracing::warn!(request_id = %req_id.0, "rejected submission: empty body");
        return Err(ApiError::bad_request(EMPTY_BODY));
    }

    let Ok(text) = std::str::from_utf8(&body) else {
        tracing::warn!(request_id = %req_id.0, "rejected submission: body is not UTF-8");
        return Err(ApiError::bad_request(INVALID_FORMAT));
    };

    let fields = FormFields::parse(text);
    let location = fields.first("Location").unwrap_or_default();
    let review_body = fields.first("ReviewBody").unwrap_or_default();

    match state.store.append(location, review_body) {
        Ok(review) => {
            tracing::info!(
                request_id = %req_id.0,
                review_id = ?review.id,
                location = %review.location,
                "review submitted"
            );
            Ok((StatusCode::CREATED, Json(review)))
        }
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "rejected submission");
            Err(ApiError::bad_request(REQUIRED_FIELDS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_fields_decode_plus_and_percent() {
        let fields = FormFields::parse("Location=El+Paso%2C+Texas&ReviewBody=50%25+off%21");
        assert_eq!(fields.first("Location"), Some("El Paso, Texas"));
        assert_eq!(fields.first("ReviewBody"), Some("50% off!"));
    }

    #[test]
    fn form_fields_take_first_value() {
        let fields = FormFields::parse("location=a&location=b");
        assert_eq!(fields.first("location"), Some("a"));
    }

    #[test]
    fn form_fields_drop_blank_values() {
        let fields = FormFields::parse("location=&location=b&start_date=");
        assert_eq!(fields.first("location"), Some("b"));
        assert_eq!(fields.first("start_date"), None);
    }

    #[test]
    fn form_fields_keys_are_case_sensitive() {
        let fields = FormFields::parse("location=Denver%2C+Colorado");
        assert_eq!(fields.first("Location"), None);
    }
}
