//! Data models for the flashcard system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::{DEFAULT_EASE_FACTOR, MIN_INTERVAL};
use crate::storage::legacy::deserialize_id;

/// A flashcard with question (front) and answer (back), carrying its own
/// spaced repetition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Uuid,
    /// Owning topic (lookup only). Nil when a legacy store left it out,
    /// until [`EntityStore::adopt_unowned_cards`] assigns one.
    ///
    /// [`EntityStore::adopt_unowned_cards`]: crate::storage::EntityStore::adopt_unowned_cards
    #[serde(default, deserialize_with = "deserialize_id")]
    pub topic_id: Uuid,
    pub front: String,
    pub back: String,
    /// Ease factor, never below 1.3
    #[serde(default = "default_ease")]
    pub ease: f64,
    /// Days until the next review, never below 1
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// When the card is due for review
    #[serde(default = "default_timestamp")]
    pub next_review_at: DateTime<Utc>,
    /// Total number of graded reviews
    #[serde(default, alias = "reviews")]
    pub review_count: u32,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_ease() -> f64 {
    DEFAULT_EASE_FACTOR
}

fn default_interval() -> u32 {
    MIN_INTERVAL
}

/// Cards stored without timestamps are treated as due since forever
fn default_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

impl Card {
    /// Create a card that is due immediately
    pub fn new(topic_id: Uuid, front: String, back: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic_id,
            front,
            back,
            ease: DEFAULT_EASE_FACTOR,
            interval: MIN_INTERVAL,
            next_review_at: now,
            review_count: 0,
            created_at: now,
        }
    }

    /// A copy of this card's content with a fresh id and schedule
    pub fn duplicate(&self, now: DateTime<Utc>) -> Self {
        Self::new(self.topic_id, self.front.clone(), self.back.clone(), now)
    }

    /// Check if the card is due for review at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

/// Statistics for one topic or the whole store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_topics: usize,
    pub total_cards: usize,
    pub due_cards: usize,
    pub mastered_cards: usize,
    pub total_streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_new_card_is_due_immediately() {
        let now = Utc::now();
        let card = Card::new(Uuid::new_v4(), "Q".to_string(), "A".to_string(), now);
        assert!(card.is_due(now));
        assert!(!card.is_due(now - Duration::seconds(1)));
        assert_eq!(card.interval, 1);
        assert_eq!(card.ease, 2.5);
        assert_eq!(card.review_count, 0);
    }

    #[test]
    fn test_duplicate_resets_schedule() {
        let now = Utc::now();
        let mut card = Card::new(Uuid::new_v4(), "Q".to_string(), "A".to_string(), now);
        card.interval = 16;
        card.ease = 2.7;
        card.review_count = 3;

        let later = now + Duration::hours(1);
        let copy = card.duplicate(later);
        assert_ne!(copy.id, card.id);
        assert_eq!(copy.topic_id, card.topic_id);
        assert_eq!(copy.front, "Q");
        assert_eq!(copy.interval, 1);
        assert_eq!(copy.review_count, 0);
        assert_eq!(copy.next_review_at, later);
    }

    #[test]
    fn test_reads_legacy_card() {
        let card: Card = serde_json::from_value(json!({
            "id": "c1",
            "topicId": "phil",
            "front": "What is Ontology?",
            "back": "Subset of metaphysics",
            "interval": 6,
            "reviews": 2
        }))
        .unwrap();

        assert_eq!(card.review_count, 2);
        assert_eq!(card.interval, 6);
        assert_eq!(card.ease, 2.5);
        assert!(card.is_due(Utc::now()));
    }

    #[test]
    fn test_serializes_camel_case() {
        let card = Card::new(Uuid::new_v4(), "Q".to_string(), "A".to_string(), Utc::now());
        let value = serde_json::to_value(&card).unwrap();
        assert!(value.get("topicId").is_some());
        assert!(value.get("nextReviewAt").is_some());
        assert!(value.get("reviewCount").is_some());
    }
}
