use crate::{CardId, Difficulty, Flashcard, Review, Store, MAX_INTERVAL_DAYS};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Length of the trailing run of reviews sharing the latest difficulty.
/// Expects reviews sorted ascending by `reviewed_at`; a single review is a
/// streak of 1, an empty history a streak of 0.
pub fn trailing_streak(reviews: &[Review]) -> u32 {
    let Some(latest) = reviews.last() else {
        return 0;
    };
    reviews
        .iter()
        .rev()
        .take_while(|r| r.difficulty == latest.difficulty)
        .count() as u32
}

/// Days until the card should come back, derived entirely from its review
/// history. Easy/Medium streaks double the base interval per consecutive
/// repeat; Hard always stays at its base, so a struggling card keeps the
/// short cycle.
pub fn next_interval_days(reviews: &[Review]) -> u32 {
    if reviews.is_empty() {
        return 1;
    }
    let mut sorted = reviews.to_vec();
    sorted.sort_by_key(|r| r.reviewed_at);
    let Some(latest) = sorted.last() else {
        return 1;
    };
    let base = latest.difficulty.base_interval_days();
    let interval = match latest.difficulty {
        Difficulty::Easy | Difficulty::Medium => {
            let streak = trailing_streak(&sorted);
            base.saturating_mul(2u32.saturating_pow(streak.saturating_sub(1)))
        }
        Difficulty::Hard => base,
    };
    interval.min(MAX_INTERVAL_DAYS)
}

/// `None` means the card has never been reviewed and is always due.
pub fn due_at(card: &Flashcard, reviews: &[Review]) -> Option<DateTime<Utc>> {
    let last = card.last_reviewed?;
    Some(last + Duration::days(next_interval_days(reviews) as i64))
}

pub fn is_due(card: &Flashcard, reviews: &[Review], now: DateTime<Utc>) -> bool {
    match due_at(card, reviews) {
        None => true,
        Some(due) => now >= due,
    }
}

/// Every card whose next review date has passed.
pub async fn due_flashcards(store: &dyn Store, now: DateTime<Utc>) -> Vec<Flashcard> {
    let mut due = Vec::new();
    for card in store.list_flashcards().await {
        let reviews = store.reviews_for(card.id).await;
        if is_due(&card, &reviews, now) {
            due.push(card);
        }
    }
    due
}

fn review_priority(d: Difficulty) -> u8 {
    match d {
        Difficulty::Hard => 0,
        Difficulty::Medium => 1,
        Difficulty::Easy => 2,
    }
}

/// Bounded review session: never-reviewed cards first, then hardest latest
/// rating, then the longest-waiting card.
pub async fn next_review_batch(
    store: &dyn Store,
    now: DateTime<Utc>,
    count: usize,
) -> Vec<Flashcard> {
    let mut due = due_flashcards(store, now).await;

    let mut latest: HashMap<CardId, Difficulty> = HashMap::new();
    for card in &due {
        let mut reviews = store.reviews_for(card.id).await;
        reviews.sort_by_key(|r| r.reviewed_at);
        if let Some(r) = reviews.last() {
            latest.insert(card.id, r.difficulty);
        }
    }

    due.sort_by(|a, b| match (a.last_reviewed, b.last_reviewed) {
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
        (Some(at), Some(bt)) => match (latest.get(&a.id), latest.get(&b.id)) {
            (Some(da), Some(db)) if da != db => {
                review_priority(*da).cmp(&review_priority(*db))
            }
            _ => at.cmp(&bt),
        },
    });

    due.truncate(count);
    due
}
