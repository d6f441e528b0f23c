use crate::reflection::TimeWindow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub habit_ids: BTreeSet<String>,
}

impl Entry {
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub habit_ids: BTreeSet<String>,
}

impl From<NewEntry> for Entry {
    fn from(new: NewEntry) -> Self {
        Self {
            date: new.date,
            mood: new.mood,
            notes: new.notes,
            habit_ids: new.habit_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitsUpdate {
    pub habit_ids: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub window: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub label: String,
    pub emoji: String,
    pub color: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub name: String,
    pub color: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub window: TimeWindow,
    pub cutoff: DateTime<Utc>,
    pub moods: Vec<MoodSummary>,
    pub habits: Vec<HabitSummary>,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub removed: usize,
}
