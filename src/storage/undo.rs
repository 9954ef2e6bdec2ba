//! Bounded undo history of collection snapshots
//!
//! Each reversible edit pushes a copy of the collection(s) it is about to
//! change. Undoing replaces those collections wholesale with the copy, which
//! stays correct however the edits in between were interleaved. Snapshots
//! are owned clones, so later edits to the live store never reach them.
//!
//! History is linear (no redo) and holds at most [`MAX_HISTORY`] entries;
//! pushing past that silently drops the oldest one.

use std::collections::VecDeque;

use super::store::EntityStore;
use crate::flashcards::Card;
use crate::topics::Topic;

/// Maximum number of undo steps kept
pub const MAX_HISTORY: usize = 5;

/// The prior value of the collection(s) touched by one edit
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Topics(Vec<Topic>),
    Cards(Vec<Card>),
    All { topics: Vec<Topic>, cards: Vec<Card> },
}

impl Snapshot {
    pub fn topics(store: &EntityStore) -> Self {
        Snapshot::Topics(store.topics().to_vec())
    }

    pub fn cards(store: &EntityStore) -> Self {
        Snapshot::Cards(store.cards().to_vec())
    }

    pub fn all(store: &EntityStore) -> Self {
        Snapshot::All {
            topics: store.topics().to_vec(),
            cards: store.cards().to_vec(),
        }
    }

    /// Put the captured collection(s) back into the store
    fn restore(self, store: &mut EntityStore) {
        match self {
            Snapshot::Topics(topics) => store.replace_topics(topics),
            Snapshot::Cards(cards) => store.replace_cards(cards),
            Snapshot::All { topics, cards } => {
                store.replace_topics(topics);
                store.replace_cards(cards);
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Snapshot::Topics(_) => "topics",
            Snapshot::Cards(_) => "cards",
            Snapshot::All { .. } => "topics and cards",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UndoManager {
    history: VecDeque<Snapshot>,
    limit: usize,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoManager {
    pub fn new() -> Self {
        Self::with_limit(MAX_HISTORY)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Record the state to return to if the next edit is undone
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.limit == 0 {
            return;
        }
        while self.history.len() >= self.limit {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
    }

    /// Roll the store back by one step. Returns false if there was nothing
    /// to undo.
    pub fn undo(&mut self, store: &mut EntityStore) -> bool {
        let Some(snapshot) = self.history.pop_back() else {
            return false;
        };
        log::debug!("Undo: restoring {}", snapshot.label());
        snapshot.restore(store);
        true
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store_with_topic() -> (EntityStore, uuid::Uuid) {
        let mut store = EntityStore::default();
        let topic = Topic::new("A".to_string());
        let id = topic.id;
        store.insert_topic(topic);
        (store, id)
    }

    #[test]
    fn test_undo_on_empty_history() {
        let (mut store, _) = store_with_topic();
        let before = store.clone();
        let mut undo = UndoManager::new();
        assert!(!undo.undo(&mut store));
        assert_eq!(store, before);
    }

    #[test]
    fn test_undo_restores_previous_collection() {
        let (mut store, topic_id) = store_with_topic();
        let mut undo = UndoManager::new();

        let before = store.clone();
        undo.push(Snapshot::cards(&store));
        store.insert_card(Card::new(topic_id, "Q".to_string(), "A".to_string(), Utc::now()));

        assert!(undo.undo(&mut store));
        assert_eq!(store, before);
        assert!(undo.is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_edits() {
        let (mut store, topic_id) = store_with_topic();
        let mut undo = UndoManager::new();

        undo.push(Snapshot::topics(&store));
        store.topic_mut(topic_id).unwrap().name = "Renamed".to_string();

        undo.undo(&mut store);
        assert_eq!(store.topic(topic_id).unwrap().name, "A");
    }

    #[test]
    fn test_history_is_bounded() {
        let (mut store, topic_id) = store_with_topic();
        let mut undo = UndoManager::new();

        for i in 0..7 {
            undo.push(Snapshot::cards(&store));
            store.insert_card(Card::new(topic_id, format!("Q{}", i), "A".to_string(), Utc::now()));
        }
        assert_eq!(undo.len(), MAX_HISTORY);

        while undo.undo(&mut store) {}
        // the two oldest steps were dropped
        assert_eq!(store.cards().len(), 2);
    }

    #[test]
    fn test_all_snapshot_reverts_cascade() {
        let (mut store, topic_id) = store_with_topic();
        store.insert_card(Card::new(topic_id, "Q".to_string(), "A".to_string(), Utc::now()));
        let before = store.clone();

        let mut undo = UndoManager::new();
        undo.push(Snapshot::all(&store));
        store.remove_topic(topic_id);
        assert!(store.cards().is_empty());

        undo.undo(&mut store);
        assert_eq!(store, before);
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let (mut store, _) = store_with_topic();
        let mut undo = UndoManager::with_limit(0);
        undo.push(Snapshot::all(&store));
        assert!(undo.is_empty());
        assert!(!undo.undo(&mut store));
    }
}
