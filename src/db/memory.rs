use std::{collections::HashMap, sync::Arc};

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{MetricStore, DUPLICATE_DAY_MESSAGE};
use crate::error::{AppError, AppResult};
use crate::models::metric::{DateRange, DayOrder, MetricEntry, MetricFields};

/// In-process `MetricStore` with the same (owner, day) uniqueness rule as the
/// `metric_entries` table.
#[derive(Clone, Default)]
pub struct MemoryMetricStore {
    entries: Arc<Mutex<HashMap<Uuid, MetricEntry>>>,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl MetricStore for MemoryMetricStore {
    async fn find_by_day(&self, owner_id: Uuid, day: NaiveDate) -> AppResult<Option<MetricEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .values()
            .find(|e| e.owner_id == owner_id && e.day == day)
            .cloned())
    }

    async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<MetricEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(&id).filter(|e| e.owner_id == owner_id).cloned())
    }

    async fn list(
        &self,
        owner_id: Uuid,
        range: DateRange,
        order: DayOrder,
    ) -> AppResult<Vec<MetricEntry>> {
        let entries = self.entries.lock().await;
        let mut matching: Vec<MetricEntry> = entries
            .values()
            .filter(|e| e.owner_id == owner_id && range.contains(e.day))
            .cloned()
            .collect();
        match order {
            DayOrder::Ascending => matching.sort_by_key(|e| e.day),
            DayOrder::Descending => matching.sort_by(|a, b| b.day.cmp(&a.day)),
        }
        Ok(matching)
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        day: NaiveDate,
        fields: &MetricFields,
    ) -> AppResult<MetricEntry> {
        let mut entries = self.entries.lock().await;
        if entries
            .values()
            .any(|e| e.owner_id == owner_id && e.day == day)
        {
            return Err(AppError::Conflict(DUPLICATE_DAY_MESSAGE.into()));
        }

        let now = Utc::now();
        let entry = MetricEntry {
            id: Uuid::new_v4(),
            owner_id,
            day,
            steps: fields.steps,
            sleep_hours: fields.sleep_hours,
            mood: fields.mood,
            notes: fields.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &MetricFields,
    ) -> AppResult<Option<MetricEntry>> {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get_mut(&id).filter(|e| e.owner_id == owner_id) else {
            return Ok(None);
        };

        entry.steps = fields.steps;
        entry.sleep_hours = fields.sleep_hours;
        entry.mood = fields.mood;
        entry.notes = fields.notes.clone();
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut entries = self.entries.lock().await;
        if entries.get(&id).is_some_and(|e| e.owner_id == owner_id) {
            entries.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_rejects_duplicate_day() {
        let store = MemoryMetricStore::new();
        let owner = Uuid::new_v4();
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        store.insert(owner, day, &MetricFields::default()).await.unwrap();
        let err = store
            .insert(owner, day, &MetricFields::default())
            .await
            .unwrap_err();

        match err {
            AppError::Conflict(msg) => assert_eq!(msg, DUPLICATE_DAY_MESSAGE),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_same_day_different_owners_allowed() {
        let store = MemoryMetricStore::new();
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        store.insert(Uuid::new_v4(), day, &MetricFields::default()).await.unwrap();
        store.insert(Uuid::new_v4(), day, &MetricFields::default()).await.unwrap();
        assert_eq!(store.len().await, 2);
    }
}
