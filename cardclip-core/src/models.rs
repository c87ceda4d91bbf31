use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CardId = Uuid;

/// Hard ceiling on any computed review interval.
pub const MAX_INTERVAL_DAYS: u32 = 365;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Base review interval in days, before any streak growth.
    pub fn base_interval_days(&self) -> u32 {
        match self {
            Difficulty::Easy => 7,
            Difficulty::Medium => 3,
            Difficulty::Hard => 1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flashcard {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Stamped by the store whenever a review for this card is saved.
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: front.into(),
            back: back.into(),
            tags: Vec::new(),
            created_at: Utc::now(),
            last_reviewed: None,
        }
    }
}

/// One review event. Append-only; references its card without owning it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub flashcard_id: CardId,
    pub reviewed_at: DateTime<Utc>,
    pub difficulty: Difficulty,
}

impl Review {
    pub fn new(flashcard_id: CardId, difficulty: Difficulty, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            flashcard_id,
            reviewed_at,
            difficulty,
        }
    }
}
