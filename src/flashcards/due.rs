//! Due-set selection
//!
//! Cards come back in store insertion order; callers step through the
//! result by index. Counts are always derived from the same filter so the
//! two can never disagree.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::Card;
use crate::storage::EntityStore;

fn due_iter<'a>(
    store: &'a EntityStore,
    topic_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &'a Card> + 'a {
    store
        .cards()
        .iter()
        .filter(move |c| topic_id.map_or(true, |t| c.topic_id == t))
        .filter(move |c| c.is_due(now))
}

/// All cards due at `now`, optionally restricted to one topic
pub fn due_cards(store: &EntityStore, topic_id: Option<Uuid>, now: DateTime<Utc>) -> Vec<&Card> {
    due_iter(store, topic_id, now).collect()
}

/// Number of cards `due_cards` would return
pub fn due_count(store: &EntityStore, topic_id: Option<Uuid>, now: DateTime<Utc>) -> usize {
    due_iter(store, topic_id, now).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::Topic;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn fixture() -> (EntityStore, Uuid, Uuid) {
        let mut store = EntityStore::default();
        let a = Topic::new("A".to_string());
        let b = Topic::new("B".to_string());
        let (a_id, b_id) = (a.id, b.id);
        store.insert_topic(a);
        store.insert_topic(b);

        let offsets = [(a_id, -2), (b_id, 0), (a_id, 3), (a_id, -1), (b_id, 5)];
        for (i, (topic_id, days)) in offsets.into_iter().enumerate() {
            let mut card = Card::new(topic_id, format!("Q{}", i), "A".to_string(), now());
            card.next_review_at = now() + Duration::days(days);
            store.insert_card(card);
        }
        (store, a_id, b_id)
    }

    #[test]
    fn test_due_cards_in_insertion_order() {
        let (store, a_id, _) = fixture();
        let fronts: Vec<_> = due_cards(&store, None, now()).iter().map(|c| c.front.clone()).collect();
        assert_eq!(fronts, vec!["Q0", "Q1", "Q3"]);

        let fronts: Vec<_> = due_cards(&store, Some(a_id), now()).iter().map(|c| c.front.clone()).collect();
        assert_eq!(fronts, vec!["Q0", "Q3"]);
    }

    #[test]
    fn test_due_boundary_is_inclusive() {
        let (store, _, b_id) = fixture();
        assert_eq!(due_count(&store, Some(b_id), now()), 1);
        assert_eq!(due_count(&store, Some(b_id), now() - Duration::seconds(1)), 0);
    }

    #[test]
    fn test_count_matches_cards() {
        let (store, a_id, b_id) = fixture();
        for topic in [None, Some(a_id), Some(b_id), Some(Uuid::new_v4())] {
            for days in -3..7 {
                let at = now() + Duration::days(days);
                assert_eq!(due_count(&store, topic, at), due_cards(&store, topic, at).len());
            }
        }
    }

    #[test]
    fn test_unknown_topic_has_nothing_due() {
        let (store, _, _) = fixture();
        assert!(due_cards(&store, Some(Uuid::new_v4()), now()).is_empty());
    }
}
