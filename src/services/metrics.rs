//! Owner-scoped entry operations: day normalization, the per-day upsert,
//! and get/list/update/delete by id.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::db::MetricStore;
use crate::error::{AppError, AppResult};
use crate::models::metric::{DateRange, DayOrder, MetricEntry, MetricFields, MetricPatch};

const NOT_FOUND_MESSAGE: &str = "Metric not found";

/// Reduce a client-supplied date or timestamp to its calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 (the date in the timestamp's own offset),
/// and offset-less `YYYY-MM-DDTHH:MM:SS[.fff]`.
pub fn normalize_day(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    Err(AppError::Validation(format!("Please enter a valid date: {raw}")))
}

/// Create the owner's entry for `day`, or merge `patch` into the existing one.
pub async fn upsert<S: MetricStore>(
    store: &S,
    owner_id: Uuid,
    day: NaiveDate,
    patch: &MetricPatch,
) -> AppResult<MetricEntry> {
    match store.find_by_day(owner_id, day).await? {
        Some(existing) => {
            let fields = MetricFields::from(&existing).merge(patch)?;
            let entry = store
                .update(owner_id, existing.id, &fields)
                .await?
                .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.into()))?;
            tracing::debug!(owner_id = %owner_id, entry_id = %entry.id, day = %day, "Metric entry updated");
            Ok(entry)
        }
        None => {
            let fields = MetricFields::default().merge(patch)?;
            let entry = store.insert(owner_id, day, &fields).await?;
            tracing::info!(owner_id = %owner_id, entry_id = %entry.id, day = %day, "Metric entry created");
            Ok(entry)
        }
    }
}

pub async fn list<S: MetricStore>(
    store: &S,
    owner_id: Uuid,
    range: DateRange,
) -> AppResult<Vec<MetricEntry>> {
    store.list(owner_id, range, DayOrder::Descending).await
}

pub async fn get<S: MetricStore>(store: &S, owner_id: Uuid, id: Uuid) -> AppResult<MetricEntry> {
    store
        .find_by_id(owner_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.into()))
}

/// Apply `patch` to an owned entry found by id, with the same merge rules as
/// [`upsert`].
pub async fn update<S: MetricStore>(
    store: &S,
    owner_id: Uuid,
    id: Uuid,
    patch: &MetricPatch,
) -> AppResult<MetricEntry> {
    let existing = get(store, owner_id, id).await?;
    let fields = MetricFields::from(&existing).merge(patch)?;
    store
        .update(owner_id, id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.into()))
}

pub async fn delete<S: MetricStore>(store: &S, owner_id: Uuid, id: Uuid) -> AppResult<()> {
    if !store.delete(owner_id, id).await? {
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.into()));
    }
    tracing::info!(owner_id = %owner_id, entry_id = %id, "Metric entry deleted");
    Ok(())
}
