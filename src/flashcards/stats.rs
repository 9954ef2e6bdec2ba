//! Review statistics

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::due::due_count;
use super::models::ReviewStats;
use crate::storage::EntityStore;

/// Cards with an interval above this many days count as mastered
pub const DEFAULT_MASTERED_AFTER_DAYS: u32 = 7;

/// Compute statistics for the whole store or a single topic
pub fn review_stats(
    store: &EntityStore,
    topic_id: Option<Uuid>,
    now: DateTime<Utc>,
    mastered_after_days: u32,
) -> ReviewStats {
    let in_scope = |id: Uuid| topic_id.map_or(true, |t| t == id);

    let topics: Vec<_> = store.topics().iter().filter(|t| in_scope(t.id)).collect();
    let cards: Vec<_> = store.cards().iter().filter(|c| in_scope(c.topic_id)).collect();

    ReviewStats {
        total_topics: topics.len(),
        total_cards: cards.len(),
        due_cards: due_count(store, topic_id, now),
        mastered_cards: cards
            .iter()
            .filter(|c| c.interval > mastered_after_days)
            .count(),
        total_streak: topics.iter().map(|t| t.streak).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::Card;
    use crate::topics::Topic;
    use chrono::Duration;

    #[test]
    fn test_review_stats() {
        let now = Utc::now();
        let mut store = EntityStore::default();

        let mut a = Topic::new("A".to_string());
        a.streak = 5;
        let mut b = Topic::new("B".to_string());
        b.streak = 2;
        let (a_id, b_id) = (a.id, b.id);
        store.insert_topic(a);
        store.insert_topic(b);

        let mut mastered = Card::new(a_id, "Q1".to_string(), "A".to_string(), now);
        mastered.interval = 16;
        mastered.next_review_at = now + Duration::days(16);
        store.insert_card(mastered);

        let mut borderline = Card::new(a_id, "Q2".to_string(), "A".to_string(), now);
        borderline.interval = 7;
        store.insert_card(borderline);

        store.insert_card(Card::new(b_id, "Q3".to_string(), "A".to_string(), now));

        let all = review_stats(&store, None, now, DEFAULT_MASTERED_AFTER_DAYS);
        assert_eq!(
            all,
            ReviewStats {
                total_topics: 2,
                total_cards: 3,
                due_cards: 2,
                mastered_cards: 1,
                total_streak: 7,
            }
        );

        let only_a = review_stats(&store, Some(a_id), now, DEFAULT_MASTERED_AFTER_DAYS);
        assert_eq!(only_a.total_topics, 1);
        assert_eq!(only_a.total_cards, 2);
        assert_eq!(only_a.due_cards, 1);
        assert_eq!(only_a.total_streak, 5);

        let strict = review_stats(&store, None, now, 20);
        assert_eq!(strict.mastered_cards, 0);
    }
}
