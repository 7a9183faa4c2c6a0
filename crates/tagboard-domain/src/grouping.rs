use std::collections::HashSet;
use uuid::Uuid;

use crate::card::{Card, CardId};
use crate::group::{DropTarget, Group, GroupKind};
use crate::tag::{tags_by_dimension, Dimension, Tag};

/// Partition the card set into ordered columns keyed by the tags of
/// `dimension`, plus a trailing untagged bucket when any card holds no tag
/// of the dimension.
///
/// Each card lands in exactly one column. For the non-exclusive client
/// dimension a card carrying several client tags goes to the first matching
/// column in index order, so the union of all columns is still the card set
/// with no duplicates. Cards within a column are stably sorted by position.
pub fn compute_groups(cards: &[Card], tags: &[Tag], dimension: Dimension) -> Vec<Group> {
    let index = tags_by_dimension(tags, dimension);

    let mut groups: Vec<Group> = Vec::with_capacity(index.len() + 1);
    let mut seen: HashSet<CardId> = HashSet::new();

    for tag in index {
        let mut members: Vec<Card> = cards
            .iter()
            .filter(|c| c.has_tag(tag.id) && !seen.contains(&c.id))
            .cloned()
            .collect();
        members.sort_by_key(|c| c.position);
        seen.extend(members.iter().map(|c| c.id));
        groups.push(Group {
            kind: GroupKind::Tagged(tag.clone()),
            cards: members,
        });
    }

    let mut untagged: Vec<Card> = cards
        .iter()
        .filter(|c| !seen.contains(&c.id))
        .cloned()
        .collect();
    if !untagged.is_empty() {
        untagged.sort_by_key(|c| c.position);
        groups.push(Group {
            kind: GroupKind::Untagged,
            cards: untagged,
        });
    }

    groups
}

/// Resolve a raw identity against the computed groups: as a column (tag)
/// identity first, then by scanning for a card with that identity. Used to
/// classify both drop targets and drag sources.
pub fn find_group_containing(groups: &[Group], id: Uuid) -> Option<&Group> {
    groups
        .iter()
        .find(|g| g.tag_id() == Some(id))
        .or_else(|| groups.iter().find(|g| g.contains(id)))
}

/// Typed drop-target resolution. Unlike [`find_group_containing`] this also
/// reaches the untagged column, which has no raw identity.
pub fn resolve_target(groups: &[Group], target: DropTarget) -> Option<&Group> {
    match target {
        DropTarget::Card(card_id) => groups.iter().find(|g| g.contains(card_id)),
        DropTarget::Column(key) => groups.iter().find(|g| g.key() == key),
    }
}

/// Classify a raw identity the way gesture payloads arrive from the
/// rendering layer: a column identity wins over a card identity.
pub fn classify_target(groups: &[Group], id: Uuid) -> Option<DropTarget> {
    let group = find_group_containing(groups, id)?;
    if group.tag_id() == Some(id) {
        Some(DropTarget::Column(group.key()))
    } else {
        Some(DropTarget::Card(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::ColumnKey;

    fn status_tags() -> Vec<Tag> {
        vec![
            Tag::new("Todo".to_string(), Dimension::Status, None, 0),
            Tag::new("In Progress".to_string(), Dimension::Status, None, 1),
            Tag::new("Done".to_string(), Dimension::Status, None, 2),
        ]
    }

    fn card_with_tags(title: &str, position: i32, tag_ids: &[uuid::Uuid]) -> Card {
        let mut card = Card::new(title.to_string(), position);
        for id in tag_ids {
            card.add_tag(*id);
        }
        card
    }

    #[test]
    fn test_groups_follow_tag_index_order() {
        let tags = status_tags();
        let cards = vec![
            card_with_tags("K3", 2, &[tags[1].id]),
            card_with_tags("K1", 0, &[tags[0].id]),
            card_with_tags("K2", 1, &[tags[0].id]),
        ];

        let groups = compute_groups(&cards, &tags, Dimension::Status);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].label(), "Todo");
        assert_eq!(
            groups[0].cards.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
            vec!["K1", "K2"]
        );
        assert_eq!(groups[1].label(), "In Progress");
        assert_eq!(groups[1].cards[0].title, "K3");
        assert_eq!(groups[2].label(), "Done");
        assert!(groups[2].cards.is_empty());
    }

    #[test]
    fn test_untagged_bucket_appended_only_when_non_empty() {
        let tags = status_tags();
        let tagged = card_with_tags("Tagged", 0, &[tags[0].id]);
        let untagged = card_with_tags("Loose", 1, &[]);

        let groups = compute_groups(&[tagged.clone()], &tags, Dimension::Status);
        assert_eq!(groups.len(), 3);

        let groups = compute_groups(&[tagged, untagged], &tags, Dimension::Status);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[3].key(), ColumnKey::Untagged);
        assert_eq!(groups[3].cards[0].title, "Loose");
    }

    #[test]
    fn test_every_card_appears_exactly_once() {
        let tags = vec![
            Tag::new("Acme".to_string(), Dimension::Client, None, 0),
            Tag::new("Internal".to_string(), Dimension::Client, None, 1),
        ];
        // Holds both client tags; must land only in the first column.
        let both = card_with_tags("Both", 0, &[tags[0].id, tags[1].id]);
        let second = card_with_tags("Second", 1, &[tags[1].id]);
        let loose = card_with_tags("Loose", 2, &[]);
        let cards = vec![both.clone(), second.clone(), loose.clone()];

        let groups = compute_groups(&cards, &tags, Dimension::Client);

        let mut all: Vec<CardId> = groups.iter().flat_map(|g| g.card_ids()).collect();
        all.sort();
        let mut expected = vec![both.id, second.id, loose.id];
        expected.sort();
        assert_eq!(all, expected);
        assert_eq!(groups[0].card_ids(), vec![both.id]);
        assert_eq!(groups[1].card_ids(), vec![second.id]);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let tags = status_tags();
        let cards = vec![
            card_with_tags("B", 1, &[tags[0].id]),
            card_with_tags("A", 0, &[tags[0].id]),
            card_with_tags("C", 2, &[]),
        ];

        let first = compute_groups(&cards, &tags, Dimension::Status);
        for _ in 0..10 {
            let again = compute_groups(&cards, &tags, Dimension::Status);
            assert_eq!(again.len(), first.len());
            for (lhs, rhs) in first.iter().zip(&again) {
                assert_eq!(lhs.key(), rhs.key());
                assert_eq!(lhs.card_ids(), rhs.card_ids());
            }
        }
    }

    #[test]
    fn test_find_group_containing_prefers_column_identity() {
        let tags = status_tags();
        let card = card_with_tags("K1", 0, &[tags[0].id]);
        let groups = compute_groups(std::slice::from_ref(&card), &tags, Dimension::Status);

        let by_tag = find_group_containing(&groups, tags[1].id).unwrap();
        assert_eq!(by_tag.key(), ColumnKey::Tag(tags[1].id));

        let by_card = find_group_containing(&groups, card.id).unwrap();
        assert_eq!(by_card.key(), ColumnKey::Tag(tags[0].id));

        assert!(find_group_containing(&groups, uuid::Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_classify_target_distinguishes_columns_from_cards() {
        let tags = status_tags();
        let card = card_with_tags("K1", 0, &[tags[0].id]);
        let groups = compute_groups(std::slice::from_ref(&card), &tags, Dimension::Status);

        assert_eq!(
            classify_target(&groups, tags[2].id),
            Some(DropTarget::Column(ColumnKey::Tag(tags[2].id)))
        );
        assert_eq!(
            classify_target(&groups, card.id),
            Some(DropTarget::Card(card.id))
        );
        assert!(classify_target(&groups, uuid::Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_resolve_target_reaches_untagged_column() {
        let tags = status_tags();
        let loose = card_with_tags("Loose", 0, &[]);
        let groups = compute_groups(std::slice::from_ref(&loose), &tags, Dimension::Status);

        let group = resolve_target(&groups, DropTarget::Column(ColumnKey::Untagged)).unwrap();
        assert_eq!(group.card_ids(), vec![loose.id]);
    }
}
