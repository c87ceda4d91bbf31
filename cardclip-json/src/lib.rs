use cardclip_core::{store::Store, CardId, CoreError, Difficulty, Flashcard, Review};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

pub mod paths;

const FILE_VERSION: u32 = 1;

#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    flashcards: Vec<Flashcard>,
    flashcard_reviews: Vec<Review>,
}

#[derive(Default, Clone)]
struct State {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    cards: HashMap<CardId, Flashcard>,
    // Global append order doubles as review chronology.
    reviews: Vec<Review>,
}

impl State {
    fn new_empty() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            cards: HashMap::new(),
            reviews: Vec::new(),
        }
    }

    fn to_image(&self) -> FileImage {
        FileImage {
            version: FILE_VERSION,
            created_at: self.created_at,
            updated_at: self.updated_at,
            flashcards: self.cards.values().cloned().collect(),
            flashcard_reviews: self.reviews.clone(),
        }
    }

    fn from_image(img: FileImage) -> Self {
        let mut cards = HashMap::new();
        for c in img.flashcards {
            cards.insert(c.id, c);
        }
        Self {
            created_at: img.created_at,
            updated_at: img.updated_at,
            cards,
            reviews: img.flashcard_reviews,
        }
    }
}

pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    state: RwLock<State>,
}

impl JsonStore {
    pub async fn open_default() -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, 10).await
    }

    pub async fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let state = load_or_init(&path).await?;
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
            state: RwLock::new(state),
        })
    }

    async fn save(&self) -> Result<(), CoreError> {
        let snapshot = {
            let mut s = self.state.write();
            s.updated_at = Utc::now();
            s.to_image()
        };
        let path = self.path.clone();
        let backups = self.backups_dir.clone();
        let keep = self.max_backups;

        let res = task::spawn_blocking(move || write_with_backup(&path, &backups, keep, &snapshot))
            .await
            .map_err(|_| CoreError::Storage("io"))?;
        if let Err(e) = res {
            tracing::warn!(error = %e, "failed to persist store file");
            return Err(CoreError::Storage("io"));
        }
        Ok(())
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

async fn load_or_init(path: &Path) -> Result<State, CoreError> {
    if path.exists() {
        let p = path.to_path_buf();
        let img: FileImage = task::spawn_blocking(move || {
            let mut f = fs::File::open(&p)?;
            let mut buf = String::new();
            f.read_to_string(&mut buf)?;
            let v = serde_json::from_str::<FileImage>(&buf)?;
            Ok::<FileImage, std::io::Error>(v)
        })
        .await
        .map_err(|_| CoreError::Storage("io"))
        .and_then(|r| r.map_err(|_| CoreError::Storage("io")))?;
        let mut st = State::from_image(img);
        st.updated_at = Utc::now();
        Ok(st)
    } else {
        let st = State::new_empty();
        let img = st.to_image();
        write_with_backup(path, &path.with_extension("backups"), 1, &img)
            .map_err(|_| CoreError::Storage("io"))?;
        Ok(st)
    }
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &FileImage,
) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img).expect("serialize");
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    let _ = fs::remove_file(path);
    tmp.persist(path)?;

    // Backup rotation
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let backup_name = format!("cardclip-{ts}.json");
    let backup_path = backups_dir.join(backup_name);
    let mut btmp = NamedTempFile::new_in(backups_dir)?;
    btmp.write_all(&json)?;
    btmp.flush()?;
    let _ = fs::remove_file(&backup_path);
    btmp.persist(&backup_path)?;

    rotate_backups(backups_dir, max_backups)?;

    Ok(())
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    if entries.len() > keep {
        for e in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(e.path());
        }
    }
    Ok(())
}

use async_trait::async_trait;

#[async_trait]
impl Store for JsonStore {
    async fn list_flashcards(&self) -> Vec<Flashcard> {
        let s = self.state.read();
        s.cards.values().cloned().collect()
    }

    async fn save_flashcard(
        &self,
        front: &str,
        back: &str,
        tags: &[String],
    ) -> Result<Flashcard, CoreError> {
        cardclip_core::store::validate_front(front)?;
        let card = {
            let mut c = Flashcard::new(front, back);
            c.tags = tags.to_vec();
            let mut s = self.state.write();
            s.cards.insert(c.id, c.clone());
            c
        };
        self.save().await?;
        Ok(card)
    }

    async fn get_flashcard(&self, id: CardId) -> Option<Flashcard> {
        let s = self.state.read();
        s.cards.get(&id).cloned()
    }

    async fn update_flashcard(&self, card: &Flashcard) -> Result<Option<Flashcard>, CoreError> {
        cardclip_core::store::validate_front(&card.front)?;
        {
            let mut s = self.state.write();
            if !s.cards.contains_key(&card.id) {
                return Ok(None);
            }
            s.cards.insert(card.id, card.clone());
        }
        self.save().await?;
        Ok(Some(card.clone()))
    }

    async fn delete_flashcard(&self, id: CardId) -> Result<bool, CoreError> {
        let removed = {
            let mut s = self.state.write();
            // Reviews for the card stay in the log.
            s.cards.remove(&id).is_some()
        };
        if removed {
            self.save().await?;
        }
        Ok(removed)
    }

    async fn list_reviews(&self) -> Vec<Review> {
        let s = self.state.read();
        s.reviews.clone()
    }

    async fn reviews_for(&self, flashcard_id: CardId) -> Vec<Review> {
        let s = self.state.read();
        s.reviews
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
        {
            // Append and stamp under one write guard.
            let mut s = self.state.write();
            s.reviews.push(review.clone());
            if let Some(card) = s.cards.get_mut(&flashcard_id) {
                card.last_reviewed = Some(review.reviewed_at);
            }
        }
        self.save().await?;
        Ok(review)
    }
}
