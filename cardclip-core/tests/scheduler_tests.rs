use cardclip_core::{
    due_at, is_due, next_interval_days, next_review_batch, trailing_streak, Difficulty, Flashcard,
    MemoryStore, Review, Store,
};
use chrono::{DateTime, Duration, Utc};

fn reviews_of(card: &Flashcard, difficulties: &[Difficulty], start: DateTime<Utc>) -> Vec<Review> {
    difficulties
        .iter()
        .enumerate()
        .map(|(i, d)| Review::new(card.id, *d, start + Duration::days(i as i64)))
        .collect()
}

#[test]
fn new_card_is_always_due() {
    let card = Flashcard::new("hola", "hello");
    let now = Utc::now();
    assert_eq!(due_at(&card, &[]), None);
    assert!(is_due(&card, &[], now));
    // Age of the card does not matter, only the missing review history.
    assert!(is_due(&card, &[], now + Duration::days(400)));
    assert_eq!(next_interval_days(&[]), 1);
}

#[test]
fn easy_streak_doubles_interval() {
    let card = Flashcard::new("a", "b");
    let t0 = Utc::now() - Duration::days(30);
    for (n, expected) in [(1, 7), (2, 14), (3, 28), (4, 56)] {
        let rs = reviews_of(&card, &vec![Difficulty::Easy; n], t0);
        assert_eq!(next_interval_days(&rs), expected);
    }
}

#[test]
fn medium_streak_doubles_from_three() {
    let card = Flashcard::new("a", "b");
    let t0 = Utc::now() - Duration::days(30);
    let rs = reviews_of(&card, &[Difficulty::Medium, Difficulty::Medium], t0);
    assert_eq!(next_interval_days(&rs), 6);
}

#[test]
fn interval_caps_at_one_year() {
    let card = Flashcard::new("a", "b");
    let t0 = Utc::now() - Duration::days(400);
    // 7 * 2^9 = 3584 without the cap.
    let rs = reviews_of(&card, &vec![Difficulty::Easy; 10], t0);
    assert_eq!(next_interval_days(&rs), 365);
}

#[test]
fn hard_never_grows() {
    let card = Flashcard::new("a", "b");
    let t0 = Utc::now() - Duration::days(30);
    let rs = reviews_of(&card, &vec![Difficulty::Hard; 5], t0);
    assert_eq!(next_interval_days(&rs), 1);
}

#[test]
fn hard_after_streak_resets_to_base() {
    let card = Flashcard::new("a", "b");
    let t0 = Utc::now() - Duration::days(30);
    let rs = reviews_of(
        &card,
        &[
            Difficulty::Easy,
            Difficulty::Easy,
            Difficulty::Easy,
            Difficulty::Hard,
        ],
        t0,
    );
    assert_eq!(next_interval_days(&rs), 1);
}

#[test]
fn streak_breaks_on_difficulty_change() {
    let card = Flashcard::new("a", "b");
    let t0 = Utc::now() - Duration::days(30);
    let rs = reviews_of(
        &card,
        &[
            Difficulty::Easy,
            Difficulty::Easy,
            Difficulty::Hard,
            Difficulty::Easy,
        ],
        t0,
    );
    // Only the trailing Easy counts: interval is 7, not 14.
    assert_eq!(trailing_streak(&rs), 1);
    assert_eq!(next_interval_days(&rs), 7);
}

#[test]
fn trailing_streak_counts_the_latest_run() {
    let card = Flashcard::new("a", "b");
    let t0 = Utc::now() - Duration::days(30);
    assert_eq!(trailing_streak(&[]), 0);
    let rs = reviews_of(&card, &[Difficulty::Medium], t0);
    assert_eq!(trailing_streak(&rs), 1);
    let rs = reviews_of(
        &card,
        &[Difficulty::Hard, Difficulty::Easy, Difficulty::Easy],
        t0,
    );
    assert_eq!(trailing_streak(&rs), 2);
}

#[test]
fn due_follows_last_reviewed_plus_interval() {
    let mut card = Flashcard::new("a", "b");
    let now = Utc::now();
    let reviewed = now - Duration::days(3);
    card.last_reviewed = Some(reviewed);
    let rs = vec![Review::new(card.id, Difficulty::Easy, reviewed)];

    assert_eq!(due_at(&card, &rs), Some(reviewed + Duration::days(7)));
    assert!(!is_due(&card, &rs, now));
    assert!(is_due(&card, &rs, now + Duration::days(5)));
}

async fn backdate_last_review(store: &MemoryStore, id: cardclip_core::CardId, days_ago: i64) {
    let mut card = store.get_flashcard(id).await.unwrap();
    card.last_reviewed = Some(Utc::now() - Duration::days(days_ago));
    store.update_flashcard(&card).await.unwrap();
}

#[tokio::test]
async fn batch_prioritizes_new_then_hard_then_overdue() {
    let store = MemoryStore::new();
    let b = store.save_flashcard("B", "b", &[]).await.unwrap();
    let c = store.save_flashcard("C", "c", &[]).await.unwrap();
    let a = store.save_flashcard("A", "a", &[]).await.unwrap();

    // B: last review Hard, overdue by 10 days (interval 1).
    store.save_review(b.id, Difficulty::Hard).await.unwrap();
    backdate_last_review(&store, b.id, 11).await;
    // C: last review Easy, overdue by 1 day (interval 7).
    store.save_review(c.id, Difficulty::Easy).await.unwrap();
    backdate_last_review(&store, c.id, 8).await;

    let batch = next_review_batch(&store, Utc::now(), 10).await;
    let ids: Vec<_> = batch.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn batch_ties_break_by_most_overdue() {
    let store = MemoryStore::new();
    let fresh = store.save_flashcard("fresh", "x", &[]).await.unwrap();
    let stale = store.save_flashcard("stale", "y", &[]).await.unwrap();

    store.save_review(fresh.id, Difficulty::Hard).await.unwrap();
    backdate_last_review(&store, fresh.id, 2).await;
    store.save_review(stale.id, Difficulty::Hard).await.unwrap();
    backdate_last_review(&store, stale.id, 9).await;

    let batch = next_review_batch(&store, Utc::now(), 10).await;
    let ids: Vec<_> = batch.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![stale.id, fresh.id]);
}

#[tokio::test]
async fn batch_respects_count() {
    let store = MemoryStore::new();
    for i in 0..15 {
        store
            .save_flashcard(&format!("card {i}"), "back", &[])
            .await
            .unwrap();
    }
    let batch = next_review_batch(&store, Utc::now(), 10).await;
    assert_eq!(batch.len(), 10);
    let all = next_review_batch(&store, Utc::now(), 100).await;
    assert_eq!(all.len(), 15);
}

#[tokio::test]
async fn recently_reviewed_cards_leave_the_due_set() {
    let store = MemoryStore::new();
    let card = store.save_flashcard("q", "a", &[]).await.unwrap();
    store.save_review(card.id, Difficulty::Easy).await.unwrap();

    let batch = next_review_batch(&store, Utc::now(), 10).await;
    assert!(batch.is_empty());
}
