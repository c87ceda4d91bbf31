use cardclip_core::{Difficulty, Flashcard, Totals};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize)]
pub struct CardOut {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl From<Flashcard> for CardOut {
    fn from(c: Flashcard) -> Self {
        Self {
            id: c.id,
            front: c.front,
            back: c.back,
            tags: c.tags,
            created_at: c.created_at,
            last_reviewed: c.last_reviewed,
        }
    }
}

/// Body for both create and full-replace update.
#[derive(Deserialize)]
pub struct CardIn {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Either a difficulty or a raw gesture label from the webcam classifier.
#[derive(Deserialize)]
pub struct ReviewIn {
    pub flashcard_id: Uuid,
    pub difficulty: Option<String>,
    pub gesture: Option<String>,
}

#[derive(Deserialize)]
pub struct BatchQuery {
    pub count: Option<usize>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct StatsOut {
    pub totals: Totals,
    pub daily_streak: u32,
}

pub fn parse_difficulty(s: &str) -> Option<Difficulty> {
    match s.to_lowercase().as_str() {
        "1" | "h" | "hard" => Some(Difficulty::Hard),
        "2" | "m" | "med" | "medium" => Some(Difficulty::Medium),
        "3" | "e" | "easy" => Some(Difficulty::Easy),
        _ => None,
    }
}
