use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tag::{Dimension, Tag, TagId};

pub type CardId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub position: i32,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(title: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            due_date: None,
            position,
            tag_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tag_ids.contains(&tag_id)
    }

    /// First tag of the given dimension carried by this card.
    pub fn tag_of<'a>(&self, tags: &'a [Tag], dimension: Dimension) -> Option<&'a Tag> {
        self.tag_ids
            .iter()
            .find_map(|id| tags.iter().find(|t| t.id == *id && t.dimension == dimension))
    }

    /// Add a tag association. Adding one that already exists is a no-op.
    pub fn add_tag(&mut self, tag_id: TagId) {
        if !self.tag_ids.contains(&tag_id) {
            self.tag_ids.push(tag_id);
            self.updated_at = Utc::now();
        }
    }

    /// Remove a tag association. Removing one that is absent is a no-op.
    pub fn remove_tag(&mut self, tag_id: TagId) {
        if let Some(index) = self.tag_ids.iter().position(|id| *id == tag_id) {
            self.tag_ids.remove(index);
            self.updated_at = Utc::now();
        }
    }

    /// Drop every tag of `dimension` from this card. Associations whose tag
    /// is unknown to the given tag set are left alone.
    pub fn clear_dimension(&mut self, tags: &[Tag], dimension: Dimension) {
        let before = self.tag_ids.len();
        self.tag_ids.retain(|id| {
            tags.iter()
                .find(|t| t.id == *id)
                .is_none_or(|t| t.dimension != dimension)
        });
        if self.tag_ids.len() != before {
            self.updated_at = Utc::now();
        }
    }

    /// Attach a tag, clearing same-dimension tags first when the dimension
    /// is exclusive.
    pub fn apply_tag(&mut self, tag: &Tag, tags: &[Tag]) {
        if tag.dimension.is_exclusive() {
            self.clear_dimension(tags, tag.dimension);
        }
        self.add_tag(tag.id);
    }

    pub fn update_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date;
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: i32) {
        self.position = position;
        self.updated_at = Utc::now();
    }
}
