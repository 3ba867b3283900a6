use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MetricEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: NaiveDate,
    pub steps: i64,
    pub sleep_hours: f64,
    pub mood: Mood,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "mood")]
pub enum Mood {
    Happy,
    Neutral,
    Tired,
    Stressed,
}

impl Mood {
    /// Fixed scan order used for tallies and tie-breaks.
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Neutral, Mood::Tired, Mood::Stressed];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Neutral => "Neutral",
            Mood::Tired => "Tired",
            Mood::Stressed => "Stressed",
        }
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self::Neutral
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Invalid mood value: {s}")))
    }
}

/// The mutable columns of an entry, as written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFields {
    pub steps: i64,
    pub sleep_hours: f64,
    pub mood: Mood,
    pub notes: Option<String>,
}

impl Default for MetricFields {
    fn default() -> Self {
        Self {
            steps: 0,
            sleep_hours: 0.0,
            mood: Mood::Neutral,
            notes: None,
        }
    }
}

impl From<&MetricEntry> for MetricFields {
    fn from(entry: &MetricEntry) -> Self {
        Self {
            steps: entry.steps,
            sleep_hours: entry.sleep_hours,
            mood: entry.mood,
            notes: entry.notes.clone(),
        }
    }
}

/// A partial update. `None` means the field was not supplied.
///
/// `mood` stays raw text: an empty mood is treated as absent. `notes` is
/// replaced whenever supplied, so `Some(None)` clears it and `Some("")`
/// stores empty text.
#[derive(Debug, Clone, Default)]
pub struct MetricPatch {
    pub steps: Option<i64>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<String>,
    pub notes: Option<Option<String>>,
}

impl MetricFields {
    pub fn merge(mut self, patch: &MetricPatch) -> Result<Self, AppError> {
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
        if let Some(sleep_hours) = patch.sleep_hours {
            self.sleep_hours = sleep_hours;
        }
        // Falsy guard, unlike the other fields: "" keeps the stored mood.
        if let Some(mood) = patch.mood.as_deref().filter(|m| !m.is_empty()) {
            self.mood = mood.parse()?;
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        Ok(self)
    }
}

/// Optional day filter. Only applied when both bounds are present; both
/// bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    #[cfg(test)]
    pub fn contains(&self, day: NaiveDate) -> bool {
        match self.bounds() {
            Some((start, end)) => start <= day && day <= end,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOrder {
    Ascending,
    Descending,
}
