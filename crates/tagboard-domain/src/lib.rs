pub mod card;
pub mod group;
pub mod grouping;
pub mod resolver;
pub mod session;
pub mod tag;

pub use card::{Card, CardId};
pub use group::{ColumnKey, DropTarget, Group, GroupKind, UNTAGGED_LABEL};
pub use grouping::{classify_target, compute_groups, find_group_containing, resolve_target};
pub use resolver::{ReorderCommand, TagDelta};
pub use session::{apply_hover_swap, DragSession};
pub use tag::{tags_by_dimension, Dimension, Tag, TagId};
