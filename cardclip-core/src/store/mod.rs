use crate::{CardId, CoreError, Difficulty, Flashcard, Review};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStore;

/// Create/update validation shared by every backend.
pub fn validate_front(front: &str) -> Result<(), CoreError> {
    if front.trim().is_empty() {
        return Err(CoreError::Invalid("flashcard front cannot be empty"));
    }
    Ok(())
}

/// Durable home of flashcards and their review log. The store is the only
/// writer of either collection and the only component allowed to stamp
/// `last_reviewed`.
///
/// Read methods degrade to empty results on a storage fault; write methods
/// surface `CoreError::Storage`. Missing ids are `None`/`false`, not errors.
/// Deleting a card keeps its review history; a review for an unknown card id
/// is still recorded.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_flashcards(&self) -> Vec<Flashcard>;

    async fn save_flashcard(
        &self,
        front: &str,
        back: &str,
        tags: &[String],
    ) -> Result<Flashcard, CoreError>;

    async fn get_flashcard(&self, id: CardId) -> Option<Flashcard>;

    /// Full replace of the stored record. `None` when the id is unknown.
    async fn update_flashcard(&self, card: &Flashcard) -> Result<Option<Flashcard>, CoreError>;

    async fn delete_flashcard(&self, id: CardId) -> Result<bool, CoreError>;

    async fn list_reviews(&self) -> Vec<Review>;

    async fn reviews_for(&self, flashcard_id: CardId) -> Vec<Review>;

    /// Appends a review stamped now and, when the card exists, stamps its
    /// `last_reviewed` in the same store call.
    async fn save_review(
        &self,
        flashcard_id: CardId,
        difficulty: Difficulty,
    ) -> Result<Review, CoreError>;
}
