use std::future::Future;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_unique_violation, DUPLICATE_DAY_MESSAGE};
use crate::error::{AppError, AppResult};
use crate::models::metric::{DateRange, DayOrder, MetricEntry, MetricFields};

/// Owner-scoped persistence for metric entries.
///
/// Every method takes the owner id; implementations must never return or
/// touch another owner's rows. `insert` must reject a second row for the same
/// (owner, day) with `AppError::Conflict`.
pub trait MetricStore {
    fn find_by_day(
        &self,
        owner_id: Uuid,
        day: NaiveDate,
    ) -> impl Future<Output = AppResult<Option<MetricEntry>>> + Send;

    fn find_by_id(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AppResult<Option<MetricEntry>>> + Send;

    fn list(
        &self,
        owner_id: Uuid,
        range: DateRange,
        order: DayOrder,
    ) -> impl Future<Output = AppResult<Vec<MetricEntry>>> + Send;

    fn insert(
        &self,
        owner_id: Uuid,
        day: NaiveDate,
        fields: &MetricFields,
    ) -> impl Future<Output = AppResult<MetricEntry>> + Send;

    /// Returns `None` when no owned entry has this id.
    fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &MetricFields,
    ) -> impl Future<Output = AppResult<Option<MetricEntry>>> + Send;

    /// Returns whether a row was removed.
    fn delete(&self, owner_id: Uuid, id: Uuid) -> impl Future<Output = AppResult<bool>> + Send;
}

pub struct MetricRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MetricRepository<'a> {
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl MetricStore for MetricRepository<'_> {
    async fn find_by_day(&self, owner_id: Uuid, day: NaiveDate) -> AppResult<Option<MetricEntry>> {
        let entry = sqlx::query_as::<_, MetricEntry>(
            "SELECT * FROM metric_entries WHERE owner_id = $1 AND day = $2",
        )
        .bind(owner_id)
        .bind(day)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<MetricEntry>> {
        let entry = sqlx::query_as::<_, MetricEntry>(
            "SELECT * FROM metric_entries WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    async fn list(
        &self,
        owner_id: Uuid,
        range: DateRange,
        order: DayOrder,
    ) -> AppResult<Vec<MetricEntry>> {
        let sql = match order {
            DayOrder::Ascending => {
                r#"
                SELECT * FROM metric_entries
                WHERE owner_id = $1
                  AND ($2::date IS NULL OR day BETWEEN $2 AND $3)
                ORDER BY day ASC
                "#
            }
            DayOrder::Descending => {
                r#"
                SELECT * FROM metric_entries
                WHERE owner_id = $1
                  AND ($2::date IS NULL OR day BETWEEN $2 AND $3)
                ORDER BY day DESC
                "#
            }
        };
        let (start, end) = range.bounds().unzip();

        let entries = sqlx::query_as::<_, MetricEntry>(sql)
            .bind(owner_id)
            .bind(start)
            .bind(end)
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        day: NaiveDate,
        fields: &MetricFields,
    ) -> AppResult<MetricEntry> {
        sqlx::query_as::<_, MetricEntry>(
            r#"
            INSERT INTO metric_entries (id, owner_id, day, steps, sleep_hours, mood, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(day)
        .bind(fields.steps)
        .bind(fields.sleep_hours)
        .bind(fields.mood)
        .bind(&fields.notes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(DUPLICATE_DAY_MESSAGE.into())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &MetricFields,
    ) -> AppResult<Option<MetricEntry>> {
        let entry = sqlx::query_as::<_, MetricEntry>(
            r#"
            UPDATE metric_entries SET
                steps = $3,
                sleep_hours = $4,
                mood = $5,
                notes = $6,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(fields.steps)
        .bind(fields.sleep_hours)
        .bind(fields.mood)
        .bind(&fields.notes)
        .fetch_optional(self.pool)
        .await?;

        Ok(entry)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM metric_entries WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
