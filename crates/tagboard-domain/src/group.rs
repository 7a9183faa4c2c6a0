use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId};
use crate::tag::{Tag, TagId};

pub const UNTAGGED_LABEL: &str = "Untagged";

/// Identity of a board column under the active grouping dimension: a real
/// tag, or the synthetic untagged bucket. The untagged bucket carries no
/// tag identity at all, so it cannot leak into persistence calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    Tag(TagId),
    Untagged,
}

impl ColumnKey {
    pub fn tag_id(self) -> Option<TagId> {
        match self {
            ColumnKey::Tag(id) => Some(id),
            ColumnKey::Untagged => None,
        }
    }
}

/// What the pointer is over, as reported by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Card(CardId),
    Column(ColumnKey),
}

/// The tag a group is keyed by, or the synthetic untagged bucket.
#[derive(Debug, Clone)]
pub enum GroupKind {
    Tagged(Tag),
    Untagged,
}

/// A derived board column: its key plus the ordered cards currently under
/// it. Recomputed from the working copy on demand, never persisted.
#[derive(Debug, Clone)]
pub struct Group {
    pub kind: GroupKind,
    pub cards: Vec<Card>,
}

impl Group {
    pub fn key(&self) -> ColumnKey {
        match &self.kind {
            GroupKind::Tagged(tag) => ColumnKey::Tag(tag.id),
            GroupKind::Untagged => ColumnKey::Untagged,
        }
    }

    pub fn tag_id(&self) -> Option<TagId> {
        self.key().tag_id()
    }

    pub fn label(&self) -> &str {
        match &self.kind {
            GroupKind::Tagged(tag) => &tag.name,
            GroupKind::Untagged => UNTAGGED_LABEL,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match &self.kind {
            GroupKind::Tagged(tag) => tag.color.as_deref(),
            GroupKind::Untagged => None,
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == card_id)
    }

    pub fn index_of(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Dimension;

    #[test]
    fn test_untagged_group_has_no_tag_identity() {
        let group = Group {
            kind: GroupKind::Untagged,
            cards: Vec::new(),
        };

        assert_eq!(group.key(), ColumnKey::Untagged);
        assert!(group.tag_id().is_none());
        assert_eq!(group.label(), UNTAGGED_LABEL);
        assert!(group.color().is_none());
    }

    #[test]
    fn test_tagged_group_exposes_tag_fields() {
        let tag = Tag::new(
            "Todo".to_string(),
            Dimension::Status,
            Some("#6B7280".to_string()),
            0,
        );
        let group = Group {
            kind: GroupKind::Tagged(tag.clone()),
            cards: Vec::new(),
        };

        assert_eq!(group.key(), ColumnKey::Tag(tag.id));
        assert_eq!(group.label(), "Todo");
        assert_eq!(group.color(), Some("#6B7280"));
    }

    #[test]
    fn test_index_of_and_contains() {
        let a = Card::new("A".to_string(), 0);
        let b = Card::new("B".to_string(), 1);
        let missing = Card::new("C".to_string(), 2);
        let group = Group {
            kind: GroupKind::Untagged,
            cards: vec![a.clone(), b.clone()],
        };

        assert!(group.contains(b.id));
        assert_eq!(group.index_of(b.id), Some(1));
        assert!(!group.contains(missing.id));
        assert!(group.index_of(missing.id).is_none());
    }
}
