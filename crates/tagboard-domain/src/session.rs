use tracing::warn;

use crate::card::{Card, CardId};
use crate::group::ColumnKey;
use crate::tag::Tag;

/// Ephemeral record of an in-flight drag gesture: the dragged card and the
/// column it originated from. Lives from gesture start to gesture end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Armed { card_id: CardId, origin: ColumnKey },
}

impl DragSession {
    /// Arm the session for a new gesture. A second arm while a gesture is
    /// in flight should not happen with a single pointer; the stale session
    /// is overwritten so the tracker fails safe.
    pub fn arm(&mut self, card_id: CardId, origin: ColumnKey) {
        if let DragSession::Armed { card_id: stale, .. } = self {
            warn!("drag session re-armed while card {} was in flight", stale);
        }
        *self = DragSession::Armed { card_id, origin };
    }

    pub fn clear(&mut self) {
        *self = DragSession::Idle;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, DragSession::Armed { .. })
    }

    pub fn armed(&self) -> Option<(CardId, ColumnKey)> {
        match self {
            DragSession::Armed { card_id, origin } => Some((*card_id, *origin)),
            DragSession::Idle => None,
        }
    }
}

/// Optimistic tag swap for intermediate gesture movement: pull the card out
/// of `from` and into `to` on the local working copy only, for immediate
/// visual feedback. Positions are left untouched; renumbering happens once
/// the gesture completes.
pub fn apply_hover_swap(
    cards: &mut [Card],
    tags: &[Tag],
    card_id: CardId,
    from: ColumnKey,
    to: ColumnKey,
) {
    if from == to {
        return;
    }
    let Some(card) = cards.iter_mut().find(|c| c.id == card_id) else {
        return;
    };
    if let Some(tag_id) = from.tag_id() {
        card.remove_tag(tag_id);
    }
    if let Some(tag_id) = to.tag_id() {
        if let Some(tag) = tags.iter().find(|t| t.id == tag_id) {
            card.apply_tag(tag, tags);
        }
    }
}
