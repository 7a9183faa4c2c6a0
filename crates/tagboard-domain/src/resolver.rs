use tracing::debug;

use tagboard_core::{BoardError, BoardResult};

use crate::card::{Card, CardId};
use crate::group::{ColumnKey, DropTarget};
use crate::grouping::{compute_groups, resolve_target};
use crate::tag::{Dimension, Tag, TagId};

/// Tag membership change accompanying a cross-column move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDelta {
    pub card_id: CardId,
    pub from_tag_id: Option<TagId>,
    pub to_tag_id: Option<TagId>,
}

/// Resolved output of a completed gesture: the affected column's full
/// ordered identity sequence, plus the tag delta when the move crossed
/// columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderCommand {
    pub column: ColumnKey,
    pub card_ids: Vec<CardId>,
    pub delta: Option<TagDelta>,
}

/// Compute the reorder command for a completed gesture.
///
/// Returns `Ok(None)` when the gesture is observably a no-op. Returns
/// `Err(BoardError::Unresolved)` when the dragged card or a column cannot
/// be located; the caller must then discard the session and refresh from
/// the source of truth rather than partially applying anything.
pub fn resolve(
    cards: &[Card],
    tags: &[Tag],
    dimension: Dimension,
    dragged: CardId,
    target: DropTarget,
    origin: ColumnKey,
) -> BoardResult<Option<ReorderCommand>> {
    guard_exclusive(cards, tags, dragged)?;

    let groups = compute_groups(cards, tags, dimension);

    let current = groups
        .iter()
        .find(|g| g.contains(dragged))
        .ok_or_else(|| BoardError::Unresolved(format!("dragged card {} is in no column", dragged)))?;
    let target_group = resolve_target(&groups, target).ok_or_else(|| {
        BoardError::Unresolved(format!("drop target {:?} matches no column", target))
    })?;

    if current.key() == origin {
        // Pure reorder inside the origin column. The drop target must be a
        // card of the same column; anything else is a no-op.
        let DropTarget::Card(over_id) = target else {
            return Ok(None);
        };
        let Some(old_index) = current.index_of(dragged) else {
            return Ok(None);
        };
        let Some(new_index) = current.index_of(over_id) else {
            return Ok(None);
        };
        if old_index == new_index {
            return Ok(None);
        }

        let mut order = current.card_ids();
        let moved = order.remove(old_index);
        order.insert(new_index, moved);

        debug!(
            "reorder within {:?}: card {} from {} to {}",
            current.key(),
            dragged,
            old_index,
            new_index
        );
        Ok(Some(ReorderCommand {
            column: current.key(),
            card_ids: order,
            delta: None,
        }))
    } else {
        // Cross-column move. The optimistic hover swap usually means the
        // dragged card already sits in the target sequence, so the index is
        // computed first and the card is pulled out before reinsertion to
        // rule out duplication.
        let mut order = target_group.card_ids();
        let insert_at = match target {
            DropTarget::Column(_) => order.len(),
            DropTarget::Card(over_id) => target_group.index_of(over_id).unwrap_or(order.len()),
        };
        order.retain(|id| *id != dragged);
        let insert_at = insert_at.min(order.len());
        order.insert(insert_at, dragged);

        let delta = TagDelta {
            card_id: dragged,
            from_tag_id: origin.tag_id(),
            to_tag_id: target_group.tag_id(),
        };

        debug!(
            "move card {} from {:?} to {:?} at index {}",
            dragged,
            origin,
            target_group.key(),
            insert_at
        );
        Ok(Some(ReorderCommand {
            column: target_group.key(),
            card_ids: order,
            delta: Some(delta),
        }))
    }
}

/// A card carrying two tags of one exclusive dimension means the delta
/// discipline was bypassed somewhere upstream. Downgraded to a resolution
/// failure so the caller re-syncs instead of silently picking one.
fn guard_exclusive(cards: &[Card], tags: &[Tag], dragged: CardId) -> BoardResult<()> {
    let card = cards.iter().find(|c| c.id == dragged).ok_or_else(|| {
        BoardError::Unresolved(format!("dragged card {} not in working copy", dragged))
    })?;
    for dimension in Dimension::ALL {
        if !dimension.is_exclusive() {
            continue;
        }
        let count = card
            .tag_ids
            .iter()
            .filter(|id| tags.iter().any(|t| t.id == **id && t.dimension == dimension))
            .count();
        if count > 1 {
            return Err(BoardError::Unresolved(format!(
                "card {} holds {} {} tags",
                card.id,
                count,
                dimension.label()
            )));
        }
    }
    Ok(())
}
