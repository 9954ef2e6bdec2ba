//! The study tracker controller
//!
//! `StudyTracker` owns the entity store, its undo history and the clock, and
//! is the only thing callers mutate the store through. Operations that name
//! a missing topic or card do nothing and say so through their return value
//! (`None`/`false`). Only imports report errors.
//!
//! Every edit, grading included, snapshots the collections it touches
//! before changing them, so `undo` always reverts exactly the last edit.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::flashcards::{self, algorithm, Card, ReviewStats};
use crate::storage::export::{self, ImportError};
use crate::storage::{EntityStore, Snapshot, UndoManager};
use crate::topics::{Connection, KeyIdea, PhaseStatus, Topic, TopicUpdate};

pub struct StudyTracker {
    store: EntityStore,
    undo: UndoManager,
    clock: Box<dyn Clock>,
    mastered_after_days: u32,
}

impl StudyTracker {
    pub fn new(store: EntityStore, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            undo: UndoManager::new(),
            clock,
            mastered_after_days: flashcards::stats::DEFAULT_MASTERED_AFTER_DAYS,
        }
    }

    pub fn with_system_clock(store: EntityStore) -> Self {
        Self::new(store, Box::new(SystemClock))
    }

    pub fn with_mastered_after_days(mut self, days: u32) -> Self {
        self.mastered_after_days = days;
        self
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }

    // ==================== Undo ====================

    /// Revert the most recent reversible edit
    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    // ==================== Topic Operations ====================

    pub fn create_topic(&mut self, name: &str) -> Option<Topic> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let topic = Topic::new(name.to_string());
        self.undo.push(Snapshot::topics(&self.store));
        self.store.insert_topic(topic.clone());
        log::debug!("Created topic {} ({})", topic.name, topic.id);
        Some(topic)
    }

    /// Delete a topic and every card it owns
    pub fn delete_topic(&mut self, topic_id: Uuid) -> bool {
        if !self.store.contains_topic(topic_id) {
            log::warn!("Ignoring delete of unknown topic {}", topic_id);
            return false;
        }

        self.undo.push(Snapshot::all(&self.store));
        if let Some((topic, cards)) = self.store.remove_topic(topic_id) {
            log::debug!("Deleted topic {} and {} cards", topic.name, cards);
        }
        true
    }

    pub fn update_topic(&mut self, topic_id: Uuid, update: TopicUpdate) -> Option<Topic> {
        if !self.store.contains_topic(topic_id) {
            log::warn!("Ignoring update of unknown topic {}", topic_id);
            return None;
        }
        if update.is_empty() {
            return self.store.topic(topic_id).cloned();
        }

        self.undo.push(Snapshot::topics(&self.store));
        let topic = self.store.topic_mut(topic_id)?;
        update.apply(topic);
        Some(topic.clone())
    }

    pub fn add_idea(&mut self, topic_id: Uuid, text: &str) -> Option<KeyIdea> {
        let text = text.trim();
        if text.is_empty() || !self.store.contains_topic(topic_id) {
            return None;
        }

        let idea = KeyIdea::new(text.to_string());
        self.undo.push(Snapshot::topics(&self.store));
        self.store.topic_mut(topic_id)?.ideas.push(idea.clone());
        Some(idea)
    }

    /// Link two key ideas of the same topic
    pub fn add_connection(&mut self, topic_id: Uuid, from: Uuid, to: Uuid, label: &str) -> bool {
        let linkable = self
            .store
            .topic(topic_id)
            .map_or(false, |t| t.has_idea(from) && t.has_idea(to));
        if !linkable {
            return false;
        }

        self.undo.push(Snapshot::topics(&self.store));
        if let Some(topic) = self.store.topic_mut(topic_id) {
            topic
                .connections
                .push(Connection::new(from, to, label.to_string()));
        }
        true
    }

    /// Set (or overwrite) the user's position on a question
    pub fn set_position(&mut self, topic_id: Uuid, key: &str, value: &str) -> bool {
        if key.trim().is_empty() || !self.store.contains_topic(topic_id) {
            return false;
        }

        self.undo.push(Snapshot::topics(&self.store));
        if let Some(topic) = self.store.topic_mut(topic_id) {
            topic.positions.insert(key.trim().to_string(), value.to_string());
        }
        true
    }

    pub fn set_phase_status(&mut self, topic_id: Uuid, phase_id: u32, status: PhaseStatus) -> bool {
        let exists = self
            .store
            .topic(topic_id)
            .map_or(false, |t| t.phases.iter().any(|p| p.id == phase_id));
        if !exists {
            return false;
        }

        self.undo.push(Snapshot::topics(&self.store));
        let phase = self
            .store
            .topic_mut(topic_id)
            .and_then(|t| t.phases.iter_mut().find(|p| p.id == phase_id));
        if let Some(phase) = phase {
            phase.status = status;
        }
        true
    }

    /// Completed phases over total phases
    pub fn topic_progress(&self, topic_id: Uuid) -> Option<(usize, usize)> {
        self.store.topic(topic_id).map(Topic::progress)
    }

    // ==================== Card Operations ====================

    pub fn add_card(&mut self, topic_id: Uuid, front: &str, back: &str) -> Option<Card> {
        let (front, back) = (front.trim(), back.trim());
        if front.is_empty() || back.is_empty() || !self.store.contains_topic(topic_id) {
            return None;
        }

        let card = Card::new(topic_id, front.to_string(), back.to_string(), self.now_utc());
        self.undo.push(Snapshot::cards(&self.store));
        self.store.insert_card(card.clone());
        log::debug!("Added card {} to topic {}", card.id, topic_id);
        Some(card)
    }

    /// Copy a card's content into a new card placed right after it
    pub fn clone_card(&mut self, card_id: Uuid) -> Option<Card> {
        let copy = self.store.card(card_id)?.duplicate(self.now_utc());

        self.undo.push(Snapshot::cards(&self.store));
        self.store.insert_card_after(card_id, copy.clone());
        Some(copy)
    }

    pub fn delete_card(&mut self, card_id: Uuid) -> bool {
        if self.store.card(card_id).is_none() {
            return false;
        }

        self.undo.push(Snapshot::cards(&self.store));
        self.store.remove_card(card_id).is_some()
    }

    /// Grade a review of a card and credit its topic's streak.
    ///
    /// Grading touches the card and its topic, so both collections are
    /// snapshotted.
    pub fn grade(&mut self, card_id: Uuid, quality: i32) -> Option<Card> {
        if self.store.card(card_id).is_none() {
            log::warn!("Ignoring grade for unknown card {}", card_id);
            return None;
        }

        let now = self.clock.now();
        self.undo.push(Snapshot::all(&self.store));
        flashcards::grade(&mut self.store, card_id, quality, &now)
    }

    /// Intervals that Again, Good and Easy would give the card right now
    pub fn preview_intervals(&self, card_id: Uuid) -> Option<[u32; 3]> {
        let card = self.store.card(card_id)?;
        Some(algorithm::preview_intervals(card, &self.clock.now()))
    }

    // ==================== Due Set ====================

    pub fn due_cards(&self, topic_id: Option<Uuid>) -> Vec<&Card> {
        flashcards::due_cards(&self.store, topic_id, self.now_utc())
    }

    pub fn due_count(&self, topic_id: Option<Uuid>) -> usize {
        flashcards::due_count(&self.store, topic_id, self.now_utc())
    }

    pub fn stats(&self, topic_id: Option<Uuid>) -> ReviewStats {
        flashcards::review_stats(&self.store, topic_id, self.now_utc(), self.mastered_after_days)
    }

    // ==================== Import / Export ====================

    pub fn export_json(&self) -> serde_json::Result<String> {
        export::export_store(&self.store, self.now_utc())
    }

    pub fn export_file_name(&self) -> String {
        export::export_file_name(self.now_utc())
    }

    /// Replace the whole store with an exported one. On error the current
    /// store is left exactly as it was.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let imported = match export::parse_import(text) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Rejected import: {}", e);
                return Err(e);
            }
        };

        self.undo.push(Snapshot::all(&self.store));
        log::info!(
            "Imported {} topics and {} cards",
            imported.topics().len(),
            imported.cards().len()
        );
        self.store = imported;
        Ok(())
    }
}
