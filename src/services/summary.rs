//! Aggregate statistics over a set of entries.

use serde::Serialize;
use uuid::Uuid;

use crate::db::MetricStore;
use crate::error::AppResult;
use crate::models::metric::{DateRange, DayOrder, MetricEntry, Mood};

/// Occurrence count per mood. All four keys are always serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoodDistribution {
    #[serde(rename = "Happy")]
    pub happy: u32,
    #[serde(rename = "Neutral")]
    pub neutral: u32,
    #[serde(rename = "Tired")]
    pub tired: u32,
    #[serde(rename = "Stressed")]
    pub stressed: u32,
}

impl MoodDistribution {
    pub fn count(&self, mood: Mood) -> u32 {
        match mood {
            Mood::Happy => self.happy,
            Mood::Neutral => self.neutral,
            Mood::Tired => self.tired,
            Mood::Stressed => self.stressed,
        }
    }

    fn record(&mut self, mood: Mood) {
        let slot = match mood {
            Mood::Happy => &mut self.happy,
            Mood::Neutral => &mut self.neutral,
            Mood::Tired => &mut self.tired,
            Mood::Stressed => &mut self.stressed,
        };
        *slot += 1;
    }

    /// Highest count wins; ties go to the mood earlier in `Mood::ALL`.
    /// Neutral when every count is zero.
    pub fn most_common(&self) -> Mood {
        let mut leader = Mood::Neutral;
        let mut max = 0;
        for mood in Mood::ALL {
            let count = self.count(mood);
            if count > max {
                leader = mood;
                max = count;
            }
        }
        leader
    }
}

/// Running sums over a set of entries, shared by the summary and the
/// narrative.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricTally {
    pub count: u32,
    pub steps_total: i64,
    pub sleep_total: f64,
    pub moods: MoodDistribution,
}

impl MetricTally {
    pub fn from_entries(entries: &[MetricEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut tally, entry| {
            tally.count += 1;
            tally.steps_total += entry.steps;
            tally.sleep_total += entry.sleep_hours;
            tally.moods.record(entry.mood);
            tally
        })
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean_steps(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.steps_total as f64 / f64::from(self.count)
    }

    pub fn mean_sleep(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.sleep_total / f64::from(self.count)
    }

    /// Percentage of entries with `mood`, in [0, 100].
    pub fn mood_percent(&self, mood: Mood) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        f64::from(self.moods.count(mood)) / f64::from(self.count) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_entries: u32,
    pub avg_steps: i64,
    /// Mean sleep with exactly one decimal, e.g. `"7.3"`.
    pub avg_sleep: String,
    pub mood_distribution: MoodDistribution,
    pub most_common_mood: Mood,
}

impl From<MetricTally> for SummaryStats {
    fn from(tally: MetricTally) -> Self {
        Self {
            total_entries: tally.count,
            avg_steps: tally.mean_steps().round() as i64,
            avg_sleep: format!("{:.1}", tally.mean_sleep()),
            mood_distribution: tally.moods,
            most_common_mood: tally.moods.most_common(),
        }
    }
}

pub fn summarize_entries(entries: &[MetricEntry]) -> SummaryStats {
    MetricTally::from_entries(entries).into()
}

/// Summary over the owner's entries in `range`. An empty range yields zeroed
/// stats, never an error.
pub async fn summarize<S: MetricStore>(
    store: &S,
    owner_id: Uuid,
    range: DateRange,
) -> AppResult<SummaryStats> {
    let entries = store.list(owner_id, range, DayOrder::Ascending).await?;
    Ok(summarize_entries(&entries))
}
