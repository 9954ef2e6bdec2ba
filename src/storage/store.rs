//! In-memory collection of topics and cards
//!
//! Both collections keep insertion order. The store enforces referential
//! integrity on insert (a card needs an existing topic) and cascades topic
//! deletion to the topic's cards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::flashcards::algorithm::{MIN_EASE_FACTOR, MIN_INTERVAL};
use crate::flashcards::Card;
use crate::topics::Topic;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Card {card_id} has ease {ease}, below the 1.3 floor")]
    EaseBelowFloor { card_id: Uuid, ease: f64 },

    #[error("Card {card_id} has interval {interval}, below the 1 day floor")]
    IntervalBelowFloor { card_id: Uuid, interval: u32 },

    #[error("Card {card_id} references missing topic {topic_id}")]
    OrphanCard { card_id: Uuid, topic_id: Uuid },

    #[error("Duplicate topic id: {0}")]
    DuplicateTopic(Uuid),

    #[error("Duplicate card id: {0}")]
    DuplicateCard(Uuid),
}

/// All topics and cards, plus any top-level fields this version does not
/// understand (kept so they survive a load/save cycle)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    topics: Vec<Topic>,
    #[serde(default)]
    cards: Vec<Card>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl EntityStore {
    /// Build a store from existing collections, checking every invariant
    pub fn from_parts(topics: Vec<Topic>, cards: Vec<Card>) -> Result<Self, StoreError> {
        let store = Self {
            topics,
            cards,
            extra: serde_json::Map::new(),
        };
        store.validate()?;
        Ok(store)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn topic(&self, id: Uuid) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn topic_mut(&mut self, id: Uuid) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|t| t.id == id)
    }

    pub fn card(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: Uuid) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn contains_topic(&self, id: Uuid) -> bool {
        self.topic(id).is_some()
    }

    /// Cards owned by a topic, in store order
    pub fn cards_for(&self, topic_id: Uuid) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.topic_id == topic_id)
    }

    pub fn insert_topic(&mut self, topic: Topic) {
        self.topics.push(topic);
    }

    /// Append a card. Refused if its topic does not exist.
    pub fn insert_card(&mut self, card: Card) -> bool {
        if !self.contains_topic(card.topic_id) {
            return false;
        }
        self.cards.push(card);
        true
    }

    /// Insert a card directly after another one (appends if `after` is gone)
    pub fn insert_card_after(&mut self, after: Uuid, card: Card) -> bool {
        if !self.contains_topic(card.topic_id) {
            return false;
        }
        match self.cards.iter().position(|c| c.id == after) {
            Some(pos) => self.cards.insert(pos + 1, card),
            None => self.cards.push(card),
        }
        true
    }

    pub fn remove_card(&mut self, id: Uuid) -> Option<Card> {
        let pos = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(pos))
    }

    /// Remove a topic together with every card it owns.
    ///
    /// Returns the topic and the number of cards removed with it.
    pub fn remove_topic(&mut self, id: Uuid) -> Option<(Topic, usize)> {
        let pos = self.topics.iter().position(|t| t.id == id)?;
        let topic = self.topics.remove(pos);

        let before = self.cards.len();
        self.cards.retain(|c| c.topic_id != id);
        Some((topic, before - self.cards.len()))
    }

    /// Give cards stored without a topic to the first topic.
    ///
    /// Early stores kept a single topic and wrote cards without `topicId`.
    /// Returns the number of cards adopted; with no topics nothing changes
    /// and `validate` reports the orphans.
    pub fn adopt_unowned_cards(&mut self) -> usize {
        let Some(owner) = self.topics.first().map(|t| t.id) else {
            return 0;
        };

        let mut adopted = 0;
        for card in self.cards.iter_mut().filter(|c| c.topic_id.is_nil()) {
            card.topic_id = owner;
            adopted += 1;
        }
        if adopted > 0 {
            log::info!("Assigned {} cards without a topic to {}", adopted, owner);
        }
        adopted
    }

    pub(crate) fn replace_topics(&mut self, topics: Vec<Topic>) {
        self.topics = topics;
    }

    pub(crate) fn replace_cards(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }

    /// Check every invariant of the data model
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut topic_ids = HashSet::new();
        for topic in &self.topics {
            if !topic_ids.insert(topic.id) {
                return Err(StoreError::DuplicateTopic(topic.id));
            }
        }

        let mut card_ids = HashSet::new();
        for card in &self.cards {
            if !card_ids.insert(card.id) {
                return Err(StoreError::DuplicateCard(card.id));
            }
            // written so that NaN fails too
            if !(card.ease >= MIN_EASE_FACTOR) {
                return Err(StoreError::EaseBelowFloor {
                    card_id: card.id,
                    ease: card.ease,
                });
            }
            if card.interval < MIN_INTERVAL {
                return Err(StoreError::IntervalBelowFloor {
                    card_id: card.id,
                    interval: card.interval,
                });
            }
            if !topic_ids.contains(&card.topic_id) {
                return Err(StoreError::OrphanCard {
                    card_id: card.id,
                    topic_id: card.topic_id,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::storage::legacy::id_from_str;
    use serde_json::json;

    fn card(topic_id: Uuid, front: &str) -> Card {
        Card::new(topic_id, front.to_string(), "A".to_string(), Utc::now())
    }

    #[test]
    fn test_insert_card_requires_topic() {
        let mut store = EntityStore::default();
        assert!(!store.insert_card(card(Uuid::new_v4(), "Q")));
        assert!(store.cards().is_empty());
    }

    #[test]
    fn test_remove_topic_cascades() {
        let mut store = EntityStore::default();
        let a = Topic::new("A".to_string());
        let b = Topic::new("B".to_string());
        let (a_id, b_id) = (a.id, b.id);
        store.insert_topic(a);
        store.insert_topic(b);
        store.insert_card(card(a_id, "a1"));
        store.insert_card(card(b_id, "b1"));
        store.insert_card(card(a_id, "a2"));

        let (removed, cascaded) = store.remove_topic(a_id).unwrap();
        assert_eq!(removed.id, a_id);
        assert_eq!(cascaded, 2);
        assert_eq!(store.cards().len(), 1);
        assert!(store.cards().iter().all(|c| c.topic_id == b_id));
        assert!(store.validate().is_ok());

        assert!(store.remove_topic(a_id).is_none());
    }

    #[test]
    fn test_insert_card_after() {
        let mut store = EntityStore::default();
        let topic = Topic::new("A".to_string());
        let topic_id = topic.id;
        store.insert_topic(topic);
        let first = card(topic_id, "1");
        let first_id = first.id;
        store.insert_card(first);
        store.insert_card(card(topic_id, "3"));
        store.insert_card_after(first_id, card(topic_id, "2"));

        let fronts: Vec<_> = store.cards().iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, ["1", "2", "3"]);
    }

    #[test]
    fn test_validate_catches_violations() {
        let topic = Topic::new("A".to_string());
        let topic_id = topic.id;

        let mut low_ease = card(topic_id, "Q");
        low_ease.ease = 1.2;
        assert!(matches!(
            EntityStore::from_parts(vec![topic.clone()], vec![low_ease]),
            Err(StoreError::EaseBelowFloor { .. })
        ));

        let mut zero_interval = card(topic_id, "Q");
        zero_interval.interval = 0;
        assert!(matches!(
            EntityStore::from_parts(vec![topic.clone()], vec![zero_interval]),
            Err(StoreError::IntervalBelowFloor { .. })
        ));

        assert!(matches!(
            EntityStore::from_parts(vec![topic.clone()], vec![card(Uuid::new_v4(), "Q")]),
            Err(StoreError::OrphanCard { .. })
        ));

        assert!(matches!(
            EntityStore::from_parts(vec![topic.clone(), topic.clone()], vec![]),
            Err(StoreError::DuplicateTopic(_))
        ));

        let mut nan = card(topic_id, "Q");
        nan.ease = f64::NAN;
        assert!(EntityStore::from_parts(vec![topic], vec![nan]).is_err());
    }

    #[test]
    fn test_unknown_top_level_keys_are_kept() {
        let store: EntityStore = serde_json::from_value(json!({
            "topics": [],
            "settings": { "theme": "dark" }
        }))
        .unwrap();
        assert!(store.cards().is_empty());

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value["settings"]["theme"], "dark");
        assert_eq!(value["cards"], json!([]));
    }

    #[test]
    fn test_adopt_unowned_cards() {
        let mut store: EntityStore = serde_json::from_value(json!({
            "topics": [{ "id": "phil", "name": "Philosophy" }, { "id": "logic", "name": "Logic" }],
            "cards": [
                { "id": "c1", "front": "Q1", "back": "A" },
                { "id": "c2", "topicId": "logic", "front": "Q2", "back": "A" }
            ]
        }))
        .unwrap();
        assert!(matches!(store.validate(), Err(StoreError::OrphanCard { .. })));

        assert_eq!(store.adopt_unowned_cards(), 1);
        let owners: Vec<_> = store.cards().iter().map(|c| c.topic_id).collect();
        assert_eq!(owners, [id_from_str("phil"), id_from_str("logic")]);
        assert!(store.validate().is_ok());
        assert_eq!(store.adopt_unowned_cards(), 0);
    }

    #[test]
    fn test_adopt_without_topics_leaves_orphans() {
        let mut store: EntityStore = serde_json::from_value(json!({
            "topics": [],
            "cards": [{ "id": "c1", "front": "Q", "back": "A" }]
        }))
        .unwrap();
        assert_eq!(store.adopt_unowned_cards(), 0);
        assert!(store.validate().is_err());
    }
}
