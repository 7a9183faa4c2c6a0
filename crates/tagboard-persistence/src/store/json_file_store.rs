use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use tagboard_core::{BoardError, BoardResult};
use tagboard_domain::{Card, CardId, Dimension, Tag, TagId};

use crate::traits::BoardStore;

const FORMAT_VERSION: u32 = 1;

/// JSON file-backed implementation of the persistence contract.
///
/// Every mutation is a read-modify-write of the whole document under an
/// in-process lock, flushed with a write-to-temp-then-rename so a crash
/// mid-write cannot corrupt the board file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// On-disk document shape.
#[derive(Debug, Serialize, Deserialize)]
struct BoardDocument {
    version: u32,
    #[serde(default)]
    cards: Vec<Card>,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl BoardDocument {
    fn empty() -> Self {
        Self {
            version: FORMAT_VERSION,
            cards: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> BoardResult<BoardDocument> {
        if !self.path.exists() {
            return Ok(BoardDocument::empty());
        }
        let bytes = fs::read(&self.path).await?;
        let document: BoardDocument = serde_json::from_slice(&bytes)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        if document.version != FORMAT_VERSION {
            return Err(BoardError::Serialization(format!(
                "Unsupported format version: {}",
                document.version
            )));
        }
        tracing::debug!("Read {} bytes from {}", bytes.len(), self.path.display());
        Ok(document)
    }

    async fn write_document(&self, document: &BoardDocument) -> BoardResult<()> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;

        // Temp file in the target directory keeps the rename on one
        // filesystem, where it is atomic.
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let temp = tempfile::NamedTempFile::new_in(parent)?;
        let temp_path = temp.path().to_path_buf();
        fs::write(&temp_path, &bytes).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    async fn mutate<F>(&self, apply: F) -> BoardResult<()>
    where
        F: FnOnce(&mut BoardDocument) -> BoardResult<()>,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        apply(&mut document)?;
        self.write_document(&document).await
    }
}

#[async_trait]
impl BoardStore for JsonFileStore {
    async fn list_cards(&self) -> BoardResult<Vec<Card>> {
        let mut cards = self.read_document().await?.cards;
        cards.sort_by_key(|c| c.position);
        Ok(cards)
    }

    async fn list_tags(&self, dimension: Option<Dimension>) -> BoardResult<Vec<Tag>> {
        let mut tags = self.read_document().await?.tags;
        if let Some(dimension) = dimension {
            tags.retain(|t| t.dimension == dimension);
        }
        tags.sort_by_key(|t| t.position);
        Ok(tags)
    }

    async fn create_card(&self, card: Card) -> BoardResult<Card> {
        let created = card.clone();
        self.mutate(|doc| {
            if doc.cards.iter().any(|c| c.id == card.id) {
                return Err(BoardError::Validation(format!(
                    "Card {} already exists",
                    card.id
                )));
            }
            doc.cards.push(card);
            Ok(())
        })
        .await?;
        tracing::info!("Created card {}", created.id);
        Ok(created)
    }

    async fn update_card(&self, card: Card) -> BoardResult<Card> {
        let updated = card.clone();
        self.mutate(|doc| {
            let stored = doc
                .cards
                .iter_mut()
                .find(|c| c.id == card.id)
                .ok_or_else(|| BoardError::NotFound(format!("Card {}", card.id)))?;
            *stored = card;
            Ok(())
        })
        .await?;
        Ok(updated)
    }

    async fn delete_card(&self, card_id: CardId) -> BoardResult<()> {
        self.mutate(|doc| {
            doc.cards.retain(|c| c.id != card_id);
            Ok(())
        })
        .await
    }

    async fn create_tag(&self, tag: Tag) -> BoardResult<Tag> {
        let created = tag.clone();
        self.mutate(|doc| {
            if doc.tags.iter().any(|t| t.id == tag.id) {
                return Err(BoardError::Validation(format!(
                    "Tag {} already exists",
                    tag.id
                )));
            }
            doc.tags.push(tag);
            Ok(())
        })
        .await?;
        tracing::info!("Created tag {}", created.id);
        Ok(created)
    }

    async fn update_tag(&self, tag: Tag) -> BoardResult<Tag> {
        let updated = tag.clone();
        self.mutate(|doc| {
            let stored = doc
                .tags
                .iter_mut()
                .find(|t| t.id == tag.id)
                .ok_or_else(|| BoardError::NotFound(format!("Tag {}", tag.id)))?;
            *stored = tag;
            Ok(())
        })
        .await?;
        Ok(updated)
    }

    async fn delete_tag(&self, tag_id: TagId) -> BoardResult<()> {
        self.mutate(|doc| {
            doc.tags.retain(|t| t.id != tag_id);
            for card in doc.cards.iter_mut() {
                card.remove_tag(tag_id);
            }
            Ok(())
        })
        .await
    }

    async fn create_card_tag(&self, card_id: CardId, tag_id: TagId) -> BoardResult<()> {
        self.mutate(|doc| {
            if !doc.tags.iter().any(|t| t.id == tag_id) {
                return Err(BoardError::NotFound(format!("Tag {}", tag_id)));
            }
            let card = doc
                .cards
                .iter_mut()
                .find(|c| c.id == card_id)
                .ok_or_else(|| BoardError::NotFound(format!("Card {}", card_id)))?;
            card.add_tag(tag_id);
            Ok(())
        })
        .await
    }

    async fn delete_card_tag(&self, card_id: CardId, tag_id: TagId) -> BoardResult<()> {
        self.mutate(|doc| {
            if let Some(card) = doc.cards.iter_mut().find(|c| c.id == card_id) {
                card.remove_tag(tag_id);
            }
            Ok(())
        })
        .await
    }

    async fn set_card_positions(&self, ordered: &[CardId]) -> BoardResult<()> {
        self.mutate(|doc| {
            for (index, card_id) in ordered.iter().enumerate() {
                if let Some(card) = doc.cards.iter_mut().find(|c| c.id == *card_id) {
                    card.update_position(index as i32);
                }
            }
            Ok(())
        })
        .await
    }
}
