use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use tagboard_core::{AppConfig, BoardError, BoardResult};
use tagboard_domain::{
    apply_hover_swap, classify_target, compute_groups, resolve_target, resolver, Card, CardId,
    Dimension, DragSession, DropTarget, Group, ReorderCommand, Tag, TagId,
};
use tagboard_persistence::{BoardStore, JsonFileStore, Reconciler};

/// Single-threaded, event-driven board engine.
///
/// Owns the working copy of cards and tags, the active grouping dimension
/// and the drag session, and turns completed gestures into reconciler
/// commits. The rendering layer feeds it gesture events and reads back the
/// group projection plus the busy signal; it never touches the working copy
/// directly.
pub struct BoardEngine {
    store: Arc<dyn BoardStore>,
    reconciler: Reconciler,
    cards: Vec<Card>,
    tags: Vec<Tag>,
    dimension: Dimension,
    session: DragSession,
    busy: bool,
}

impl BoardEngine {
    /// Load the engine against a store, pulling the initial working copy.
    pub async fn load(store: Arc<dyn BoardStore>, dimension: Dimension) -> BoardResult<Self> {
        let mut engine = Self {
            reconciler: Reconciler::new(store.clone()),
            store,
            cards: Vec::new(),
            tags: Vec::new(),
            dimension,
            session: DragSession::default(),
            busy: false,
        };
        engine.refresh().await?;
        Ok(engine)
    }

    /// Convenience constructor wiring the JSON-backed store from the user
    /// configuration.
    pub async fn from_config(config: &AppConfig) -> BoardResult<Self> {
        let dimension: Dimension = config.effective_default_dimension().parse()?;
        let store = Arc::new(JsonFileStore::new(config.effective_data_file()));
        Self::load(store, dimension).await
    }

    /// Replace the working copy with authoritative state from the store.
    pub async fn refresh(&mut self) -> BoardResult<()> {
        self.cards = self.store.list_cards().await?;
        self.tags = self.store.list_tags(None).await?;
        info!(
            "refreshed working copy: {} cards, {} tags",
            self.cards.len(),
            self.tags.len()
        );
        Ok(())
    }

    /// The current column projection for the rendering layer.
    pub fn groups(&self) -> Vec<Group> {
        compute_groups(&self.cards, &self.tags, self.dimension)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// True while a gesture commit is in flight against the store.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Switch the grouping axis. Any armed session is discarded: its origin
    /// column is meaningless under the new axis.
    pub fn set_dimension(&mut self, dimension: Dimension) {
        if self.dimension != dimension {
            self.dimension = dimension;
            self.session.clear();
        }
    }

    /// Classify a raw identity from a gesture payload as a card or column
    /// target, against the current grouping.
    pub fn classify(&self, id: Uuid) -> Option<DropTarget> {
        classify_target(&self.groups(), id)
    }

    /// Gesture start: capture the dragged card's origin column.
    pub fn drag_start(&mut self, card_id: CardId) -> BoardResult<()> {
        let groups = self.groups();
        let origin = groups
            .iter()
            .find(|g| g.contains(card_id))
            .map(|g| g.key())
            .ok_or_else(|| {
                BoardError::Unresolved(format!("card {} is on no column", card_id))
            })?;
        self.session.arm(card_id, origin);
        debug!("drag started: card {} from {:?}", card_id, origin);
        Ok(())
    }

    /// Intermediate gesture movement: when the pointer crosses into a
    /// different column, swap the card's tag on the working copy only so
    /// the move shows immediately. Ignored while no gesture is armed.
    pub fn drag_over(&mut self, target: DropTarget) {
        let Some((card_id, _)) = self.session.armed() else {
            return;
        };
        let groups = self.groups();
        let Some(current) = groups.iter().find(|g| g.contains(card_id)).map(|g| g.key()) else {
            return;
        };
        let Some(hovered) = resolve_target(&groups, target).map(|g| g.key()) else {
            return;
        };
        if hovered != current {
            apply_hover_swap(&mut self.cards, &self.tags, card_id, current, hovered);
            debug!("optimistic swap: card {} to {:?}", card_id, hovered);
        }
    }

    /// Gesture completion. `None` means the gesture ended without a valid
    /// drop target: the session is discarded and the working copy re-synced
    /// since there is no local undo log for the optimistic swaps.
    pub async fn drag_end(&mut self, target: Option<DropTarget>) -> BoardResult<()> {
        let Some((card_id, origin)) = self.session.armed() else {
            return Ok(());
        };
        self.session.clear();

        let Some(target) = target else {
            debug!("gesture for card {} ended without a target", card_id);
            return self.refresh().await;
        };

        let command = match resolver::resolve(
            &self.cards,
            &self.tags,
            self.dimension,
            card_id,
            target,
            origin,
        ) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(BoardError::Unresolved(reason)) => {
                debug!("gesture discarded: {}", reason);
                return self.refresh().await;
            }
            Err(other) => return Err(other),
        };

        self.busy = true;
        let committed = self.reconciler.commit(&command).await;
        self.busy = false;

        match committed {
            Ok(Some(cards)) => {
                self.cards = cards;
                Ok(())
            }
            Ok(None) => {
                self.apply_local_order(&command);
                Ok(())
            }
            Err(err) => {
                // No rollback: the optimistic working copy stays visible
                // until the next refresh.
                error!("gesture commit failed: {}", err);
                Err(err)
            }
        }
    }

    /// Renumber the working copy to the dense order just written, so the
    /// projection matches the store without a re-fetch.
    fn apply_local_order(&mut self, command: &ReorderCommand) {
        for (index, card_id) in command.card_ids.iter().enumerate() {
            if let Some(card) = self.cards.iter_mut().find(|c| c.id == *card_id) {
                card.update_position(index as i32);
            }
        }
    }

    /// Create a card at the end of the board-wide order.
    pub async fn create_card(
        &mut self,
        title: &str,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
        tag_ids: &[TagId],
    ) -> BoardResult<Card> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::Validation("Card title cannot be empty".to_string()));
        }

        let next = self.cards.iter().map(|c| c.position).max().unwrap_or(-1) + 1;
        let mut card = Card::new(title.to_string(), next);
        card.update_description(description);
        card.set_due_date(due_date);
        for tag_id in tag_ids {
            let tag = self.tag(*tag_id)?.clone();
            card.apply_tag(&tag, &self.tags);
        }

        let card = self.store.create_card(card).await?;
        self.refresh().await?;
        Ok(card)
    }

    /// Full replace of a card, tag set included. The tag set must respect
    /// the one-tag-per-exclusive-dimension rule.
    pub async fn update_card(&mut self, mut card: Card) -> BoardResult<Card> {
        let title = card.title.trim().to_string();
        if title.is_empty() {
            return Err(BoardError::Validation("Card title cannot be empty".to_string()));
        }
        card.title = title;
        self.ensure_exclusive(&card)?;

        let card = self.store.update_card(card).await?;
        self.refresh().await?;
        Ok(card)
    }

    pub async fn delete_card(&mut self, card_id: CardId) -> BoardResult<()> {
        self.store.delete_card(card_id).await?;
        self.refresh().await
    }

    /// Create a tag at the end of its dimension's column order.
    pub async fn create_tag(
        &mut self,
        name: &str,
        dimension: Dimension,
        color: Option<String>,
    ) -> BoardResult<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::Validation("Tag name cannot be empty".to_string()));
        }

        let next = self
            .tags
            .iter()
            .filter(|t| t.dimension == dimension)
            .map(|t| t.position)
            .max()
            .unwrap_or(-1)
            + 1;
        let tag = self
            .store
            .create_tag(Tag::new(name.to_string(), dimension, color, next))
            .await?;
        self.refresh().await?;
        Ok(tag)
    }

    pub async fn rename_tag(&mut self, tag_id: TagId, name: &str) -> BoardResult<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::Validation("Tag name cannot be empty".to_string()));
        }
        let mut tag = self.tag(tag_id)?.clone();
        tag.rename(name.to_string());
        let tag = self.store.update_tag(tag).await?;
        self.refresh().await?;
        Ok(tag)
    }

    pub async fn set_tag_color(&mut self, tag_id: TagId, color: Option<String>) -> BoardResult<Tag> {
        let mut tag = self.tag(tag_id)?.clone();
        tag.set_color(color);
        let tag = self.store.update_tag(tag).await?;
        self.refresh().await?;
        Ok(tag)
    }

    /// Delete a tag everywhere: the index, and every card carrying it.
    pub async fn delete_tag(&mut self, tag_id: TagId) -> BoardResult<()> {
        self.store.delete_tag(tag_id).await?;
        self.refresh().await
    }

    fn tag(&self, tag_id: TagId) -> BoardResult<&Tag> {
        self.tags
            .iter()
            .find(|t| t.id == tag_id)
            .ok_or_else(|| BoardError::NotFound(format!("Tag {}", tag_id)))
    }

    fn ensure_exclusive(&self, card: &Card) -> BoardResult<()> {
        for dimension in Dimension::ALL {
            if !dimension.is_exclusive() {
                continue;
            }
            let count = card
                .tag_ids
                .iter()
                .filter(|id| {
                    self.tags
                        .iter()
                        .any(|t| t.id == **id && t.dimension == dimension)
                })
                .count();
            if count > 1 {
                return Err(BoardError::Validation(format!(
                    "A card may hold at most one {} tag",
                    dimension.label()
                )));
            }
        }
        Ok(())
    }
}
