//! Tabular export of an owner's entries, oldest day first.

use serde::Serialize;
use uuid::Uuid;

use crate::db::MetricStore;
use crate::error::{AppError, AppResult};
use crate::models::metric::{DateRange, DayOrder, MetricEntry};

pub const CSV_HEADER: [&str; 5] = ["Date", "Steps", "Sleep Hours", "Mood", "Notes"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: String,
    pub steps: i64,
    pub sleep_hours: f64,
    pub mood: String,
    pub notes: String,
}

impl From<&MetricEntry> for ExportRow {
    fn from(entry: &MetricEntry) -> Self {
        Self {
            date: entry.day.format("%Y-%m-%d").to_string(),
            steps: entry.steps,
            sleep_hours: entry.sleep_hours,
            mood: entry.mood.to_string(),
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }
}

impl ExportRow {
    fn cells(&self) -> [String; 5] {
        [
            self.date.clone(),
            self.steps.to_string(),
            self.sleep_hours.to_string(),
            self.mood.clone(),
            self.notes.clone(),
        ]
    }
}

/// Rows for entries already sorted by ascending day.
pub fn rows_from_entries(entries: &[MetricEntry]) -> AppResult<Vec<ExportRow>> {
    if entries.is_empty() {
        return Err(AppError::NoData("No data to export".into()));
    }
    Ok(entries.iter().map(ExportRow::from).collect())
}

pub async fn to_table<S: MetricStore>(
    store: &S,
    owner_id: Uuid,
    range: DateRange,
) -> AppResult<Vec<ExportRow>> {
    let entries = store.list(owner_id, range, DayOrder::Ascending).await?;
    rows_from_entries(&entries)
}

pub fn render_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().copied());
    for row in rows {
        push_record(&mut out, row.cells().iter().map(String::as_str));
    }
    out
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryMetricStore;
    use crate::models::metric::{MetricPatch, Mood};
    use crate::services::metrics::upsert;
    use crate::services::summary::tests::entry;
    use chrono::NaiveDate;

    #[test]
    fn test_row_without_notes_is_empty_string() {
        let row = ExportRow::from(&entry(5, 4200, 7.5, Mood::Tired));
        assert_eq!(row.date, "2026-01-05");
        assert_eq!(row.notes, "");
        assert_eq!(row.mood, "Tired");
    }

    #[test]
    fn test_empty_is_no_data() {
        assert!(matches!(rows_from_entries(&[]), Err(AppError::NoData(_))));
    }

    #[test]
    fn test_render_csv() {
        let mut with_notes = entry(2, 8000, 8.0, Mood::Happy);
        with_notes.notes = Some("ran 5k, felt \"great\"".into());
        let rows = rows_from_entries(&[entry(1, 4200, 7.5, Mood::Tired), with_notes]).unwrap();

        let csv = render_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Steps,Sleep Hours,Mood,Notes");
        assert_eq!(lines[1], "2026-01-01,4200,7.5,Tired,");
        assert_eq!(lines[2], "2026-01-02,8000,8,Happy,\"ran 5k, felt \"\"great\"\"\"");
    }

    #[tokio::test]
    async fn test_to_table_sorted_ascending() {
        let store = MemoryMetricStore::new();
        let owner = Uuid::new_v4();
        for day in [20, 3, 11] {
            upsert(
                &store,
                owner,
                NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
                &MetricPatch { notes: Some((day == 3).then(|| "first".to_string())), ..Default::default() },
            )
            .await
            .unwrap();
        }

        let rows = to_table(&store, owner, DateRange::default()).await.unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-04-03", "2026-04-11", "2026-04-20"]);
        assert_eq!(rows[0].notes, "first");
        assert_eq!(rows[1].notes, "");
    }

    #[tokio::test]
    async fn test_to_table_empty_range_is_no_data() {
        let store = MemoryMetricStore::new();
        let err = to_table(&store, Uuid::new_v4(), DateRange::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NoData(_)));
    }
}
