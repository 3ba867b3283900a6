//! Rule-based mood narrative. The first matching base rule wins; the two
//! tips are evaluated independently and appended sleep first.

use uuid::Uuid;

use super::summary::MetricTally;
use crate::db::MetricStore;
use crate::error::{AppError, AppResult};
use crate::models::metric::{DateRange, DayOrder, MetricEntry, Mood};

const POSITIVE: &str =
    "You've been in a positive mood most of the time. Keep up whatever is making you happy!";
const STRESSED: &str = "You've experienced significant stress recently. Consider practicing relaxation techniques or adjusting your routine.";
const LOW_ENERGY: &str = "You've been feeling tired more often. Make sure you're getting enough quality sleep and managing your energy levels.";
const BALANCED: &str =
    "Your mood has been fairly balanced. You're maintaining a good equilibrium in your daily life.";

const SLEEP_TIP: &str =
    "Based on your sleep patterns, you might benefit from aiming for 7-9 hours of sleep per night.";
const STEPS_TIP: &str = "Increasing your daily steps could help boost your energy and mood.";

const HAPPY_PERCENT_THRESHOLD: f64 = 50.0;
const STRESSED_PERCENT_THRESHOLD: f64 = 40.0;
const MIN_SLEEP_HOURS: f64 = 7.0;
const MIN_STEPS: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodTrend {
    Positive,
    Stressed,
    LowEnergy,
    Balanced,
}

impl MoodTrend {
    pub fn classify(tally: &MetricTally) -> Self {
        if tally.mood_percent(Mood::Happy) > HAPPY_PERCENT_THRESHOLD {
            Self::Positive
        } else if tally.mood_percent(Mood::Stressed) > STRESSED_PERCENT_THRESHOLD {
            Self::Stressed
        } else if tally.moods.count(Mood::Tired) > tally.moods.count(Mood::Happy) {
            Self::LowEnergy
        } else {
            Self::Balanced
        }
    }

    fn text(self) -> &'static str {
        match self {
            Self::Positive => POSITIVE,
            Self::Stressed => STRESSED,
            Self::LowEnergy => LOW_ENERGY,
            Self::Balanced => BALANCED,
        }
    }
}

pub fn narrate_entries(entries: &[MetricEntry]) -> AppResult<String> {
    let tally = MetricTally::from_entries(entries);
    if tally.is_empty() {
        return Err(AppError::NoData("No data available for summary".into()));
    }

    let mut parts = vec![MoodTrend::classify(&tally).text()];
    if tally.mean_sleep() < MIN_SLEEP_HOURS {
        parts.push(SLEEP_TIP);
    }
    if tally.mean_steps() < MIN_STEPS {
        parts.push(STEPS_TIP);
    }
    Ok(parts.join(" "))
}

pub async fn narrate<S: MetricStore>(
    store: &S,
    owner_id: Uuid,
    range: DateRange,
) -> AppResult<String> {
    let entries = store.list(owner_id, range, DayOrder::Ascending).await?;
    narrate_entries(&entries)
}
