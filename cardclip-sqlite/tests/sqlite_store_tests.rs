use cardclip_core::{CoreError, Difficulty, Store};
use cardclip_sqlite::SqliteStore;
use uuid::Uuid;

#[tokio::test]
async fn crud_roundtrip() {
    let store = SqliteStore::open_memory().await.unwrap();

    let card = store
        .save_flashcard("hola", "hello", &["spanish".to_string()])
        .await
        .unwrap();
    let fetched = store.get_flashcard(card.id).await.unwrap();
    assert_eq!(fetched, card);

    let mut edited = fetched.clone();
    edited.back = "hi".to_string();
    let updated = store.update_flashcard(&edited).await.unwrap().unwrap();
    assert_eq!(updated.back, "hi");
    assert_eq!(store.get_flashcard(card.id).await.unwrap().back, "hi");

    assert!(store.delete_flashcard(card.id).await.unwrap());
    assert!(store.get_flashcard(card.id).await.is_none());
    assert!(!store.delete_flashcard(card.id).await.unwrap());
}

#[tokio::test]
async fn validation_applies() {
    let store = SqliteStore::open_memory().await.unwrap();
    assert!(matches!(
        store.save_flashcard("  ", "back", &[]).await,
        Err(CoreError::Invalid(_))
    ));
}

#[tokio::test]
async fn review_appends_and_stamps() {
    let store = SqliteStore::open_memory().await.unwrap();
    let card = store.save_flashcard("q", "a", &[]).await.unwrap();

    let review = store.save_review(card.id, Difficulty::Hard).await.unwrap();
    let fetched = store.get_flashcard(card.id).await.unwrap();
    assert_eq!(fetched.last_reviewed, Some(review.reviewed_at));

    let history = store.reviews_for(card.id).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].difficulty, Difficulty::Hard);
}

#[tokio::test]
async fn delete_keeps_review_log() {
    let store = SqliteStore::open_memory().await.unwrap();
    let card = store.save_flashcard("q", "a", &[]).await.unwrap();
    store.save_review(card.id, Difficulty::Easy).await.unwrap();

    assert!(store.delete_flashcard(card.id).await.unwrap());
    assert_eq!(store.reviews_for(card.id).await.len(), 1);
    assert_eq!(store.list_reviews().await.len(), 1);
}

#[tokio::test]
async fn orphan_review_is_accepted() {
    let store = SqliteStore::open_memory().await.unwrap();
    let ghost = Uuid::new_v4();
    store.save_review(ghost, Difficulty::Medium).await.unwrap();
    assert_eq!(store.list_reviews().await.len(), 1);
    assert!(store.list_flashcards().await.is_empty());
}
