use crate::Difficulty;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Labels the webcam classifier can emit. The classifier itself lives
/// outside the core; only its closed output set is modeled here.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    ThumbsUp,
    ThumbsDown,
    OpenPalm,
}

impl Gesture {
    pub fn difficulty(&self) -> Difficulty {
        match self {
            Gesture::ThumbsUp => Difficulty::Easy,
            Gesture::ThumbsDown => Difficulty::Hard,
            Gesture::OpenPalm => Difficulty::Hard,
        }
    }

    pub fn parse(label: &str) -> Option<Gesture> {
        match label {
            "thumbs_up" => Some(Gesture::ThumbsUp),
            "thumbs_down" => Some(Gesture::ThumbsDown),
            // Older classifier builds report the same pose as "flat_hand".
            "open_palm" | "flat_hand" => Some(Gesture::OpenPalm),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConfirmState {
    Idle,
    Candidate {
        gesture: Gesture,
        since: DateTime<Utc>,
    },
}

/// Debounce for raw per-frame classifier output: a gesture counts only after
/// the same label has been observed continuously for the hold duration.
/// Losing the hand or switching labels resets the candidate.
#[derive(Clone, Debug)]
pub struct GestureConfirmer {
    hold: Duration,
    state: ConfirmState,
}

impl GestureConfirmer {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            state: ConfirmState::Idle,
        }
    }

    pub fn with_default_hold() -> Self {
        Self::new(Duration::seconds(3))
    }

    /// Feed one classifier frame. Emits the gesture once its hold completes,
    /// then returns to idle.
    pub fn observe(&mut self, label: Option<Gesture>, now: DateTime<Utc>) -> Option<Gesture> {
        match (label, self.state) {
            (None, _) => {
                self.state = ConfirmState::Idle;
                None
            }
            (Some(g), ConfirmState::Candidate { gesture, since }) if gesture == g => {
                if now - since >= self.hold {
                    self.state = ConfirmState::Idle;
                    Some(g)
                } else {
                    None
                }
            }
            (Some(g), _) => {
                self.state = ConfirmState::Candidate {
                    gesture: g,
                    since: now,
                };
                None
            }
        }
    }
}

impl Default for GestureConfirmer {
    fn default() -> Self {
        Self::with_default_hold()
    }
}
