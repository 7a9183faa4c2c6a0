use async_trait::async_trait;

use tagboard_core::BoardResult;
use tagboard_domain::{Card, CardId, Dimension, Tag, TagId};

/// Abstract contract over the board's source of truth.
///
/// Association writes are idempotent in both directions: creating a link
/// that already exists and deleting one that does not are not errors, so a
/// concurrent actor getting there first cannot fail a commit.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// All cards, ascending by position, with their tag associations.
    async fn list_cards(&self) -> BoardResult<Vec<Card>>;

    /// Tags, optionally filtered to one dimension, ascending by position.
    async fn list_tags(&self, dimension: Option<Dimension>) -> BoardResult<Vec<Tag>>;

    async fn create_card(&self, card: Card) -> BoardResult<Card>;

    /// Full replace of the stored card, tag associations included.
    async fn update_card(&self, card: Card) -> BoardResult<Card>;

    /// Deleting a card that is already gone is not an error.
    async fn delete_card(&self, card_id: CardId) -> BoardResult<()>;

    async fn create_tag(&self, tag: Tag) -> BoardResult<Tag>;

    async fn update_tag(&self, tag: Tag) -> BoardResult<Tag>;

    /// Deletes the tag and strips it from every card carrying it.
    async fn delete_tag(&self, tag_id: TagId) -> BoardResult<()>;

    async fn create_card_tag(&self, card_id: CardId, tag_id: TagId) -> BoardResult<()>;

    async fn delete_card_tag(&self, card_id: CardId, tag_id: TagId) -> BoardResult<()>;

    /// Assign each listed card a dense position equal to its index in the
    /// batch. Ids not present in the store are skipped; the batch is not
    /// transactional.
    async fn set_card_positions(&self, ordered: &[CardId]) -> BoardResult<()>;
}
