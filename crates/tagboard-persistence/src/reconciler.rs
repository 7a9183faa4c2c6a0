use std::sync::Arc;

use tracing::{debug, info};

use tagboard_core::BoardResult;
use tagboard_domain::{Card, ReorderCommand};

use crate::traits::BoardStore;

/// Translates a resolved reorder command into writes against the
/// persistence collaborator.
///
/// The tag delta always lands before the position batch, and every step is
/// awaited before the next is issued, so a reader never observes positions
/// from a move whose membership change has not landed yet.
pub struct Reconciler {
    store: Arc<dyn BoardStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Commit a command. Returns the re-fetched authoritative cards after a
    /// cross-column move; `None` after a same-column reorder, whose local
    /// optimistic order already matches what was written. A failed write
    /// surfaces as-is: nothing is rolled back or retried here.
    pub async fn commit(&self, command: &ReorderCommand) -> BoardResult<Option<Vec<Card>>> {
        if let Some(delta) = &command.delta {
            if let Some(from) = delta.from_tag_id {
                debug!("removing tag {} from card {}", from, delta.card_id);
                self.store.delete_card_tag(delta.card_id, from).await?;
            }
            if let Some(to) = delta.to_tag_id {
                debug!("adding tag {} to card {}", to, delta.card_id);
                self.store.create_card_tag(delta.card_id, to).await?;
            }
        }

        self.store.set_card_positions(&command.card_ids).await?;
        info!(
            "committed order of {} cards for {:?}",
            command.card_ids.len(),
            command.column
        );

        if command.delta.is_some() {
            let cards = self.store.list_cards().await?;
            Ok(Some(cards))
        } else {
            Ok(None)
        }
    }
}
