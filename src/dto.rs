//! # Wellness API: Request/Response DTOs
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Validation is expressed via `validator` derive macros
//! - Legacy camelCase spellings (`startDate`, `sleep`) are accepted as aliases

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppResult;
use crate::models::metric::{DateRange, MetricEntry, MetricPatch, Mood};
use crate::services::metrics::normalize_day;

// ============================================================================
// Common
// ============================================================================

/// Standard delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
}

/// GET /api/auth/me
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
}

// ============================================================================
// Metrics
// ============================================================================

/// Optional fields shared by the upsert and update-by-id bodies.
/// A missing key means "leave unchanged".
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MetricFieldsRequest {
    #[validate(range(min = 0, message = "Steps must be a positive number"))]
    pub steps: Option<i64>,

    #[serde(alias = "sleep")]
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,

    /// Empty string is accepted and means "keep the current mood".
    #[validate(custom = "validate_mood")]
    pub mood: Option<String>,

    /// `null` clears the notes; a missing key leaves them unchanged.
    #[serde(default, deserialize_with = "present_or_null")]
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<Option<String>>,
}

impl MetricFieldsRequest {
    pub fn into_patch(self) -> MetricPatch {
        MetricPatch {
            steps: self.steps,
            sleep_hours: self.sleep_hours,
            mood: self.mood,
            notes: self.notes,
        }
    }
}

/// Maps a present key to `Some`, so an explicit `null` becomes `Some(None)`.
/// Paired with `#[serde(default)]` for the missing-key case.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

fn validate_mood(mood: &str) -> Result<(), ValidationError> {
    if mood.is_empty() || mood.parse::<Mood>().is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("mood");
    err.message = Some("Invalid mood value".into());
    Err(err)
}

/// POST /api/metrics
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertMetricRequest {
    /// Date or timestamp; the time of day is discarded.
    pub date: String,

    #[serde(flatten)]
    #[validate]
    pub fields: MetricFieldsRequest,
}

/// Query params for list, summary, narrative and export.
/// Bounds take the same date or timestamp forms as the upsert body; an empty
/// value counts as absent.
#[derive(Debug, Default, Deserialize)]
pub struct MetricRangeQuery {
    #[serde(default, alias = "startDate", deserialize_with = "empty_string_as_none")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate", deserialize_with = "empty_string_as_none")]
    pub end_date: Option<String>,
}

impl MetricRangeQuery {
    pub fn range(&self) -> AppResult<DateRange> {
        let start = self.start_date.as_deref().map(normalize_day).transpose()?;
        let end = self.end_date.as_deref().map(normalize_day).transpose()?;
        Ok(DateRange::new(start, end))
    }
}

/// Response for POST /api/metrics and PUT /api/metrics/{id}
#[derive(Debug, Serialize)]
pub struct MetricSavedResponse {
    pub message: String,
    pub metric: MetricEntry,
}

/// GET /api/metrics
#[derive(Debug, Serialize)]
pub struct MetricListResponse {
    pub count: usize,
    pub metrics: Vec<MetricEntry>,
}

/// GET /api/metrics/ai/summary
#[derive(Debug, Serialize)]
pub struct NarrativeResponse {
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_upsert_request_accepts_sleep_alias() {
        let json = r#"{"date":"2026-02-10","steps":0,"sleep":6.5,"mood":""}"#;
        let req: UpsertMetricRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());

        let patch = req.fields.into_patch();
        assert_eq!(patch.steps, Some(0));
        assert_eq!(patch.sleep_hours, Some(6.5));
        assert_eq!(patch.mood.as_deref(), Some(""));
        assert!(patch.notes.is_none());
    }

    #[test]
    fn test_missing_fields_stay_unset() {
        let req: UpsertMetricRequest = serde_json::from_str(r#"{"date":"2026-02-10"}"#).unwrap();
        let patch = req.fields.into_patch();
        assert!(patch.steps.is_none());
        assert!(patch.sleep_hours.is_none());
        assert!(patch.mood.is_none());
    }

    #[test]
    fn test_upsert_request_requires_date() {
        assert!(serde_json::from_str::<UpsertMetricRequest>(r#"{"steps":10}"#).is_err());
    }

    #[test]
    fn test_out_of_range_values_fail_validation() {
        let negative = MetricFieldsRequest { steps: Some(-1), ..Default::default() };
        assert!(negative.validate().is_err());

        let too_much_sleep = MetricFieldsRequest { sleep_hours: Some(24.5), ..Default::default() };
        assert!(too_much_sleep.validate().is_err());

        let long_notes = MetricFieldsRequest { notes: Some(Some("x".repeat(501))), ..Default::default() };
        assert!(long_notes.validate().is_err());
    }

    #[test]
    fn test_unknown_mood_fails_validation() {
        let req = MetricFieldsRequest { mood: Some("Angry".into()), ..Default::default() };
        assert!(req.validate().is_err());

        let ok = MetricFieldsRequest { mood: Some("Stressed".into()), ..Default::default() };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_nested_fields_validated_through_upsert() {
        let json = r#"{"date":"2026-02-10","sleep_hours":30}"#;
        let req: UpsertMetricRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_notes_null_differs_from_missing() {
        let cleared: UpsertMetricRequest =
            serde_json::from_str(r#"{"date":"2026-02-10","notes":null}"#).unwrap();
        assert!(cleared.validate().is_ok());
        assert_eq!(cleared.fields.into_patch().notes, Some(None));

        let untouched: UpsertMetricRequest = serde_json::from_str(r#"{"date":"2026-02-10"}"#).unwrap();
        assert_eq!(untouched.fields.into_patch().notes, None);

        let text: MetricFieldsRequest = serde_json::from_str(r#"{"notes":"walked"}"#).unwrap();
        assert_eq!(text.into_patch().notes, Some(Some("walked".to_string())));
    }

    #[test]
    fn test_steps_accept_values_beyond_i32() {
        let req: MetricFieldsRequest = serde_json::from_str(r#"{"steps":3000000000}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.into_patch().steps, Some(3_000_000_000));
    }

    fn query(uri: &str) -> MetricRangeQuery {
        let uri: axum::http::Uri = uri.parse().unwrap();
        axum::extract::Query::<MetricRangeQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_range_query_accepts_camel_case() {
        let range = query("/api/metrics?startDate=2026-01-01&endDate=2026-01-31").range().unwrap();
        assert_eq!(
            range.bounds(),
            Some((
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
            ))
        );
    }

    #[test]
    fn test_range_query_accepts_timestamps() {
        let range = query(
            "/api/metrics?startDate=2026-01-01T00:00:00.000Z&endDate=2026-01-31T23:59:59.999Z",
        )
        .range()
        .unwrap();
        assert_eq!(
            range.bounds(),
            Some((
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
            ))
        );
    }

    #[test]
    fn test_range_query_empty_values_mean_no_filter() {
        let q = query("/api/metrics?startDate=&endDate=");
        assert!(q.start_date.is_none());
        assert!(q.end_date.is_none());
        assert_eq!(q.range().unwrap(), DateRange::default());
    }

    #[test]
    fn test_range_query_bad_bound_is_validation_error() {
        let err = query("/api/metrics?startDate=soon&endDate=2026-01-31").range().unwrap_err();
        assert!(matches!(err, crate::error::AppError::Validation(_)));
    }

    #[test]
    fn test_register_validation() {
        let bad = RegisterRequest { email: "nope".into(), password: "123456".into() };
        assert!(bad.validate().is_err());

        let short = RegisterRequest { email: "a@b.com".into(), password: "12345".into() };
        assert!(short.validate().is_err());

        let ok = RegisterRequest { email: "a@b.com".into(), password: "123456".into() };
        assert!(ok.validate().is_ok());
    }
}
