use crate::{CardId, CoreError, Difficulty, Flashcard, Review};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryStore {
    cards: RwLock<HashMap<CardId, Flashcard>>,
    reviews: RwLock<Vec<Review>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::store::Store for MemoryStore {
    async fn list_flashcards(&self) -> Vec<Flashcard> {
        self.cards.read().values().cloned().collect()
    }

    async fn save_flashcard(
        &self,
        front: &str,
        back: &str,
        tags: &[String],
    ) -> Result<Flashcard, CoreError> {
        crate::store::validate_front(front)?;
        let mut card = Flashcard::new(front, back);
        card.tags = tags.to_vec();
        self.cards.write().insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_flashcard(&self, id: CardId) -> Option<Flashcard> {
        self.cards.read().get(&id).cloned()
    }

    async fn update_flashcard(&self, card: &Flashcard) -> Result<Option<Flashcard>, CoreError> {
        crate::store::validate_front(&card.front)?;
        let mut m = self.cards.write();
        if !m.contains_key(&card.id) {
            return Ok(None);
        }
        m.insert(card.id, card.clone());
        Ok(Some(card.clone()))
    }

    async fn delete_flashcard(&self, id: CardId) -> Result<bool, CoreError> {
        // Review history stays behind.
        Ok(self.cards.write().remove(&id).is_some())
    }

    async fn list_reviews(&self) -> Vec<Review> {
        self.reviews.read().clone()
    }

    async fn reviews_for(&self, flashcard_id: CardId) -> Vec<Review> {
        self.reviews
            .read()
            .iter()
            .filter(|r| r.flashcard_id == flashcard_id)
            .cloned()
            .collect()
    }

    async fn save_review(
        &self,
        flashcard_id: CardId,
        difficulty: Difficulty,
    ) -> Result<Review, CoreError> {
        let review = Review::new(flashcard_id, difficulty, Utc::now());
        // Both guards held so the append and the stamp land together.
        let mut cards = self.cards.write();
        let mut reviews = self.reviews.write();
        reviews.push(review.clone());
        if let Some(card) = cards.get_mut(&flashcard_id) {
            card.last_reviewed = Some(review.reviewed_at);
        }
        Ok(review)
    }
}
