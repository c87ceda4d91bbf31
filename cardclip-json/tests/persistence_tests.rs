use cardclip_json::JsonStore;
use cardclip_core::{Difficulty, Store};
use tempfile::tempdir;

#[tokio::test]
async fn survives_reopen() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("cardclip.json");
    let backups = dir.path().join("backups");

    let card_id = {
        let store = JsonStore::open_with(file.clone(), backups.clone(), 3)
            .await
            .unwrap();
        let card = store
            .save_flashcard("hola", "hello", &["spanish".to_string()])
            .await
            .unwrap();
        store.save_review(card.id, Difficulty::Hard).await.unwrap();
        card.id
    };

    let store = JsonStore::open_with(file, backups, 3).await.unwrap();
    let card = store.get_flashcard(card_id).await.unwrap();
    assert_eq!(card.front, "hola");
    assert_eq!(card.tags, vec!["spanish".to_string()]);
    assert!(card.last_reviewed.is_some());

    let reviews = store.reviews_for(card_id).await;
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].difficulty, Difficulty::Hard);
    assert_eq!(card.last_reviewed, Some(reviews[0].reviewed_at));
}

#[tokio::test]
async fn deleted_card_leaves_reviews_on_disk() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("cardclip.json");
    let backups = dir.path().join("backups");

    let store = JsonStore::open_with(file.clone(), backups.clone(), 3)
        .await
        .unwrap();
    let card = store.save_flashcard("q", "a", &[]).await.unwrap();
    store.save_review(card.id, Difficulty::Easy).await.unwrap();
    assert!(store.delete_flashcard(card.id).await.unwrap());
    drop(store);

    let store = JsonStore::open_with(file, backups, 3).await.unwrap();
    assert!(store.get_flashcard(card.id).await.is_none());
    assert_eq!(store.reviews_for(card.id).await.len(), 1);
}

#[tokio::test]
async fn on_disk_collections_are_named() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("cardclip.json");
    let backups = dir.path().join("backups");

    let store = JsonStore::open_with(file.clone(), backups, 3).await.unwrap();
    let card = store.save_flashcard("q", "a", &[]).await.unwrap();
    store.save_review(card.id, Difficulty::Medium).await.unwrap();
    drop(store);

    let raw = std::fs::read_to_string(&file).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["flashcards"].as_array().unwrap().len(), 1);
    assert_eq!(doc["flashcard_reviews"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rotates_backups() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("cardclip.json");
    let backups = dir.path().join("backups");

    let store = JsonStore::open_with(file, backups.clone(), 2).await.unwrap();
    for i in 0..5 {
        store
            .save_flashcard(&format!("card {i}"), "back", &[])
            .await
            .unwrap();
    }

    let count = std::fs::read_dir(&backups)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .count();
    assert!(count <= 2);
}
