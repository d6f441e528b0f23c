use crate::catalog::{Catalog, HabitDefinition, MoodDefinition};
use crate::errors::AppError;
use crate::models::{Entry, HabitSummary, MoodSummary, Summary};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const HABIT_PALETTE: [&str; 5] = ["#F472B6", "#A78BFA", "#60A5FA", "#34D399", "#FBBF24"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "last365days")]
    Last365Days,
}

impl TimeWindow {
    pub fn days(self) -> i64 {
        match self {
            TimeWindow::Last7Days => 7,
            TimeWindow::Last30Days => 30,
            TimeWindow::Last365Days => 365,
        }
    }

    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Last7Days => "last7days",
            TimeWindow::Last30Days => "last30days",
            TimeWindow::Last365Days => "last365days",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "last7days" => Ok(TimeWindow::Last7Days),
            "last30days" => Ok(TimeWindow::Last30Days),
            "last365days" => Ok(TimeWindow::Last365Days),
            other => Err(AppError::bad_request(format!(
                "unknown window '{other}', expected last7days, last30days or last365days"
            ))),
        }
    }
}

pub fn color_for<'a>(index: usize, palette: &[&'a str]) -> &'a str {
    if palette.is_empty() {
        return "";
    }
    palette[index % palette.len()]
}

pub fn summarize_moods(
    entries: &[Entry],
    moods: &[MoodDefinition],
    window_start: DateTime<Utc>,
) -> Vec<MoodSummary> {
    moods
        .iter()
        .map(|mood| {
            let count = windowed(entries, window_start)
                .filter(|entry| entry.mood.as_deref() == Some(mood.label.as_str()))
                .count() as u64;

            MoodSummary {
                label: mood.label.clone(),
                emoji: mood.emoji.clone(),
                color: mood.color.clone(),
                count,
            }
        })
        .collect()
}

pub fn summarize_habits(
    entries: &[Entry],
    habits: &[HabitDefinition],
    window: TimeWindow,
) -> Vec<HabitSummary> {
    summarize_habits_at(entries, habits, window, Utc::now())
}

pub fn summarize_habits_at(
    entries: &[Entry],
    habits: &[HabitDefinition],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Vec<HabitSummary> {
    let cutoff = window.cutoff(now);

    habits
        .iter()
        .enumerate()
        .map(|(index, habit)| {
            let count = windowed(entries, cutoff)
                .filter(|entry| entry.habit_ids.contains(&habit.id))
                .count() as u64;

            HabitSummary {
                name: habit.label.clone(),
                color: color_for(index, &HABIT_PALETTE).to_string(),
                count,
            }
        })
        .collect()
}

pub fn build_summary(entries: &[Entry], catalog: &Catalog, window: TimeWindow) -> Summary {
    build_summary_at(entries, catalog, window, Utc::now())
}

pub fn build_summary_at(
    entries: &[Entry],
    catalog: &Catalog,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Summary {
    let cutoff = window.cutoff(now);

    Summary {
        window,
        cutoff,
        moods: summarize_moods(entries, &catalog.moods, cutoff),
        habits: summarize_habits_at(entries, &catalog.habits, window, now),
    }
}

// Half-open: [start, +inf).
fn windowed(entries: &[Entry], start: DateTime<Utc>) -> impl Iterator<Item = &Entry> {
    entries.iter().filter(move |entry| entry.date >= start)
}
