use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodDefinition {
    pub label: String,
    pub emoji: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDefinition {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub moods: Vec<MoodDefinition>,
    pub habits: Vec<HabitDefinition>,
}

impl Catalog {
    pub fn has_mood(&self, label: &str) -> bool {
        self.moods.iter().any(|mood| mood.label == label)
    }

    pub fn has_habit(&self, id: &str) -> bool {
        self.habits.iter().any(|habit| habit.id == id)
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let bytes = fs::read(path).await?;
        let catalog: Catalog = serde_json::from_slice(&bytes)?;
        if catalog.moods.is_empty() || catalog.habits.is_empty() {
            return Err(AppError::from(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{}: catalog must list at least one mood and one habit", path.display()),
            )));
        }
        Ok(catalog)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let mood = |emoji: &str, label: &str, color: &str| MoodDefinition {
            label: label.to_string(),
            emoji: emoji.to_string(),
            color: color.to_string(),
        };
        let habit = |id: &str, label: &str| HabitDefinition {
            id: id.to_string(),
            label: label.to_string(),
        };

        Self {
            moods: vec![
                mood("😔", "Sad", "#E879F9"),
                mood("😐", "Neutral", "#C084FC"),
                mood("😁", "Happy", "#8B5CF6"),
            ],
            habits: vec![
                habit("exercise", "Exercise"),
                habit("meditation", "Meditation"),
                habit("reading", "Reading"),
                habit("healthy-eating", "Healthy eating"),
                habit("sleep", "Good sleep rhythm"),
            ],
        }
    }
}
