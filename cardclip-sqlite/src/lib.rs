use cardclip_core::{store::Store, CardId, CoreError, Difficulty, Flashcard, Review};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let url = format!("sqlite://{}?mode=rwc", path.as_ref().to_string_lossy());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn open_memory() -> Result<Self, CoreError> {
        // A single connection so every query sees the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        // No foreign key from reviews to flashcards: the review log outlives
        // its cards and accepts ids that never existed.
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS flashcards (
          id             TEXT PRIMARY KEY,
          front          TEXT NOT NULL,
          back           TEXT NOT NULL,
          tags           TEXT NOT NULL,
          created_at     TEXT NOT NULL,
          last_reviewed  TEXT
        );

        CREATE TABLE IF NOT EXISTS flashcard_reviews (
          seq           INTEGER PRIMARY KEY AUTOINCREMENT,
          flashcard_id  TEXT NOT NULL,
          reviewed_at   TEXT NOT NULL,
          difficulty    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reviews_card_time
          ON flashcard_reviews (flashcard_id, reviewed_at);
        "#;

        // Execute statements one by one for compatibility.
        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn list_flashcards(&self) -> Vec<Flashcard> {
        let rows = sqlx::query(
            "SELECT id,front,back,tags,created_at,last_reviewed FROM flashcards ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await;
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "flashcard read failed, serving empty list");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| row_into_card(row).ok())
            .collect()
    }

    async fn save_flashcard(
        &self,
        front: &str,
        back: &str,
        tags: &[String],
    ) -> Result<Flashcard, CoreError> {
        cardclip_core::store::validate_front(front)?;
        let mut card = Flashcard::new(front, back);
        card.tags = tags.to_vec();

        sqlx::query(
            "INSERT INTO flashcards (id,front,back,tags,created_at,last_reviewed) VALUES (?,?,?,?,?,?)",
        )
        .bind(card.id.to_string())
        .bind(&card.front)
        .bind(&card.back)
        .bind(tags_to_json(&card.tags))
        .bind(dt_to_str(card.created_at))
        .bind(card.last_reviewed.map(dt_to_str))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "flashcard insert failed");
            CoreError::Storage("insert flashcard")
        })?;

        Ok(card)
    }

    async fn get_flashcard(&self, id: CardId) -> Option<Flashcard> {
        let row = sqlx::query(
            "SELECT id,front,back,tags,created_at,last_reviewed FROM flashcards WHERE id=?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .ok()??;
        row_into_card(row).ok()
    }

    async fn update_flashcard(&self, card: &Flashcard) -> Result<Option<Flashcard>, CoreError> {
        cardclip_core::store::validate_front(&card.front)?;
        let res = sqlx::query(
            "UPDATE flashcards SET front=?, back=?, tags=?, created_at=?, last_reviewed=? WHERE id=?",
        )
        .bind(&card.front)
        .bind(&card.back)
        .bind(tags_to_json(&card.tags))
        .bind(dt_to_str(card.created_at))
        .bind(card.last_reviewed.map(dt_to_str))
        .bind(card.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "flashcard update failed");
            CoreError::Storage("update flashcard")
        })?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(card.clone()))
    }

    async fn delete_flashcard(&self, id: CardId) -> Result<bool, CoreError> {
        // Reviews for the card are left in place.
        let res = sqlx::query("DELETE FROM flashcards WHERE id=?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "flashcard delete failed");
                CoreError::Storage("delete flashcard")
            })?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_reviews(&self) -> Vec<Review> {
        let rows = sqlx::query(
            "SELECT flashcard_id,reviewed_at,difficulty FROM flashcard_reviews ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await;
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "review read failed, serving empty list");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| row_into_review(row).ok())
            .collect()
    }

    async fn reviews_for(&self, flashcard_id: CardId) -> Vec<Review> {
        let rows = sqlx::query(
            "SELECT flashcard_id,reviewed_at,difficulty FROM flashcard_reviews WHERE flashcard_id=? ORDER BY seq ASC",
        )
        .bind(flashcard_id.to_string())
        .fetch_all(&self.pool)
        .await;
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "review read failed, serving empty list");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| row_into_review(row).ok())
            .collect()
    }

    async fn save_review(
        &self,
        flashcard_id: CardId,
        difficulty: Difficulty,
    ) -> Result<Review, CoreError> {
        let review = Review::new(flashcard_id, difficulty, Utc::now());

        // Append and stamp inside one transaction.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| CoreError::Storage("tx"))?;

        sqlx::query(
            "INSERT INTO flashcard_reviews (flashcard_id,reviewed_at,difficulty) VALUES (?,?,?)",
        )
        .bind(review.flashcard_id.to_string())
        .bind(dt_to_str(review.reviewed_at))
        .bind(difficulty_to_i(review.difficulty))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "review insert failed");
            CoreError::Storage("insert review")
        })?;

        // Unknown card ids simply match no row; the review still stands.
        sqlx::query("UPDATE flashcards SET last_reviewed=? WHERE id=?")
            .bind(dt_to_str(review.reviewed_at))
            .bind(review.flashcard_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("stamp last_reviewed"))?;

        tx.commit().await.map_err(|_| CoreError::Storage("tx commit"))?;
        Ok(review)
    }
}

// ===== Helpers =====
fn uuid_from_str(s: String) -> Result<uuid::Uuid, CoreError> {
    uuid::Uuid::parse_str(&s).map_err(|_| CoreError::Invalid("uuid"))
}

fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn dt_from_str(s: String) -> Result<DateTime<Utc>, CoreError> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map_err(|_| CoreError::Invalid("datetime"))
        .map(|dt| dt.with_timezone(&Utc))
}

fn tags_to_json(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

fn difficulty_to_i(d: Difficulty) -> i64 {
    match d {
        Difficulty::Hard => 1,
        Difficulty::Medium => 2,
        Difficulty::Easy => 3,
    }
}

fn difficulty_from_i(i: i64) -> Option<Difficulty> {
    match i {
        1 => Some(Difficulty::Hard),
        2 => Some(Difficulty::Medium),
        3 => Some(Difficulty::Easy),
        _ => None,
    }
}

fn row_into_card(row: sqlx::sqlite::SqliteRow) -> Result<Flashcard, CoreError> {
    let tags_json: String = row.get("tags");
    let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();

    Ok(Flashcard {
        id: uuid_from_str(row.get::<String, _>("id"))?,
        front: row.get::<String, _>("front"),
        back: row.get::<String, _>("back"),
        tags,
        created_at: dt_from_str(row.get::<String, _>("created_at"))?,
        last_reviewed: row
            .get::<Option<String>, _>("last_reviewed")
            .map(dt_from_str)
            .transpose()?,
    })
}

fn row_into_review(row: sqlx::sqlite::SqliteRow) -> Result<Review, CoreError> {
    Ok(Review {
        flashcard_id: uuid_from_str(row.get::<String, _>("flashcard_id"))?,
        reviewed_at: dt_from_str(row.get::<String, _>("reviewed_at"))?,
        difficulty: difficulty_from_i(row.get::<i64, _>("difficulty"))
            .ok_or(CoreError::Invalid("difficulty"))?,
    })
}
