//! Durable storage of the entity store
//!
//! The whole store lives under a single key (`lt_data`), stored on disk as
//! `{base_path}/lt_data.json`. A missing file means first run, which is
//! answered with the built-in example dataset.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

use super::legacy::id_from_str;
use super::store::{EntityStore, StoreError};
use crate::flashcards::Card;
use crate::topics::{Connection, KeyIdea, Phase, PhaseStatus, Topic, TopicStatus};

/// Key the store is saved under
pub const STORE_KEY: &str = "lt_data";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored data is inconsistent: {0}")]
    Invalid(#[from] StoreError),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Encode the store as JSON bytes
pub fn serialize(store: &EntityStore) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(store)?)
}

/// Decode a stored snapshot, or produce the example dataset when there is
/// none yet
pub fn deserialize(bytes: Option<&[u8]>, now: DateTime<Utc>) -> Result<EntityStore> {
    let Some(bytes) = bytes else {
        log::info!("No saved data, starting from the example dataset");
        return Ok(example_dataset(now));
    };

    let mut store: EntityStore = serde_json::from_slice(bytes)?;
    store.adopt_unowned_cards();
    store.validate()?;
    Ok(store)
}

/// The dataset shown to a first-time user
pub fn example_dataset(now: DateTime<Utc>) -> EntityStore {
    let mut topic = Topic::new("Philosophy".to_string());
    topic.id = id_from_str("phil");
    topic.description = "Deep exploration of fundamental questions".to_string();
    topic.status = TopicStatus::InProgress;
    topic.streak = 5;
    topic.phases = [
        ("The Map", PhaseStatus::Complete),
        ("Ethics Deep Dive", PhaseStatus::InProgress),
        ("Meaning & Existence", PhaseStatus::Pending),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, status), id)| Phase {
        id,
        name: name.to_string(),
        status,
    })
    .collect();
    topic
        .positions
        .insert("morality".to_string(), "Contextual relativism".to_string());
    topic
        .positions
        .insert("meaning".to_string(), "Found, not chosen".to_string());
    topic.ideas = [
        ("i1", "Metaphysics asks \"What is real?\" Ethics asks \"What is good?\""),
        ("i2", "Ethics can stand alone from metaphysics"),
        ("i3", "Ontology is a subset of metaphysics"),
    ]
    .into_iter()
    .map(|(id, text)| KeyIdea {
        id: id_from_str(id),
        text: text.to_string(),
    })
    .collect();
    topic.connections = vec![Connection::new(
        id_from_str("i1"),
        id_from_str("i2"),
        "builds on".to_string(),
    )];
    topic.tags = vec![
        "philosophy".to_string(),
        "ethics".to_string(),
        "morality".to_string(),
    ];
    topic.extra.insert(
        "philosophers".to_string(),
        json!([
            { "name": "Plato", "position": "Objective realism", "idea": "Forms/Ideas" },
            { "name": "Aristotle", "position": "Virtue ethics", "idea": "Golden mean" },
            { "name": "Kant", "position": "Deontology", "idea": "Categorical imperative" },
            { "name": "Hume", "position": "Sentimentalism", "idea": "Is-ought problem" },
            { "name": "Nietzsche", "position": "Nihilism/Affirmation", "idea": "Will to power" }
        ]),
    );
    topic.extra.insert(
        "quotes".to_string(),
        json!([
            { "text": "The unexamined life is not worth living", "author": "Socrates" },
            { "text": "He who has a why can bear almost any how", "author": "Nietzsche" },
            { "text": "Morality is how we make ourselves worthy", "author": "Kant" }
        ]),
    );
    topic.extra.insert(
        "experiments".to_string(),
        json!([
            { "name": "Trolley Problem", "desc": "Pull lever to save 5 but kill 1?", "impl": ["Utilitarianism", "Active vs passive"] },
            { "name": "Ship of Theseus", "desc": "Replaced planks = same ship?", "impl": ["Identity", "Continuity"] },
            { "name": "Experience Machine", "desc": "Infinite pleasure vs reality?", "impl": ["Hedonism", "Authenticity"] }
        ]),
    );

    let cards = [
        (
            "c1",
            "Metaphysics vs Ethics?",
            "Metaphysics asks \"What is real?\" Ethics asks \"What is good?\"",
            3,
        ),
        ("c2", "Ethics standalone?", "Yes. Facts don't imply values.", 2),
        ("c3", "What is Ontology?", "Subset of metaphysics", 2),
    ]
    .into_iter()
    .map(|(id, front, back, reviews)| {
        let mut card = Card::new(topic.id, front.to_string(), back.to_string(), now);
        card.id = id_from_str(id);
        card.interval = 6;
        card.review_count = reviews;
        card
    })
    .collect::<Vec<_>>();

    let mut store = EntityStore::default();
    store.insert_topic(topic);
    for card in cards {
        store.insert_card(card);
    }
    store
}

/// File-backed persistence gateway
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("learntrack"))
            .ok_or(PersistenceError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file holding the store
    pub fn store_path(&self) -> PathBuf {
        self.base_path.join(format!("{}.json", STORE_KEY))
    }

    /// Load the saved store, or the example dataset on first run
    pub fn load(&self, now: DateTime<Utc>) -> Result<EntityStore> {
        let path = self.store_path();
        if !path.exists() {
            return deserialize(None, now);
        }

        let bytes = fs::read(&path)?;
        let store = deserialize(Some(bytes.as_slice()), now)?;
        log::info!(
            "Loaded {} topics and {} cards from {:?}",
            store.topics().len(),
            store.cards().len(),
            path
        );
        Ok(store)
    }

    /// Save the store, replacing the previous file atomically
    pub fn save(&self, store: &EntityStore) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        let path = self.store_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serialize(store)?)?;
        fs::rename(&tmp, &path)?;

        log::debug!("Saved store to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_example_dataset_is_valid() {
        let now = Utc::now();
        let store = example_dataset(now);
        assert!(store.validate().is_ok());
        assert_eq!(store.topics().len(), 1);
        assert_eq!(store.cards().len(), 3);

        let topic = &store.topics()[0];
        assert_eq!(topic.name, "Philosophy");
        assert_eq!(topic.progress(), (1, 3));
        assert!(topic.has_idea(topic.connections[0].from));
        assert!(store.cards().iter().all(|c| c.is_due(now)));

        for (key, len) in [("philosophers", 5), ("quotes", 3), ("experiments", 3)] {
            assert_eq!(topic.extra[key].as_array().map(Vec::len), Some(len), "{}", key);
        }
        let value = serde_json::to_value(topic).unwrap();
        assert_eq!(value["quotes"][0]["author"], "Socrates");
    }

    #[test]
    fn test_deserialize_without_snapshot() {
        let now = Utc::now();
        assert_eq!(deserialize(None, now).unwrap(), example_dataset(now));
    }

    #[test]
    fn test_serialize_round_trip() {
        let store = example_dataset(Utc::now());
        let bytes = serialize(&store).unwrap();
        assert_eq!(deserialize(Some(bytes.as_slice()), Utc::now()).unwrap(), store);
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_data() {
        let bytes = br#"{"topics":[],"cards":[{"id":"c1","topicId":"gone","front":"Q","back":"A"}]}"#;
        assert!(matches!(
            deserialize(Some(&bytes[..]), Utc::now()),
            Err(PersistenceError::Invalid(StoreError::OrphanCard { .. }))
        ));
        assert!(matches!(
            deserialize(Some(&b"not json"[..]), Utc::now()),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_file_storage_first_run_and_save() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));
        let now = Utc::now();

        let mut store = storage.load(now).unwrap();
        assert_eq!(store, example_dataset(now));
        assert!(!storage.store_path().exists());

        let topic_id = store.topics()[0].id;
        store.remove_topic(topic_id);
        storage.save(&store).unwrap();
        assert!(storage.store_path().exists());

        let reloaded = storage.load(Utc::now()).unwrap();
        assert_eq!(reloaded, store);
        assert!(reloaded.topics().is_empty());
    }

    #[test]
    fn test_load_legacy_store() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        fs::write(
            storage.store_path(),
            r#"{
                "topics": [{
                    "id": "phil", "name": "Philosophy", "desc": "Fundamental questions",
                    "status": "active", "streak": 5, "lastReview": "Sun Oct 18 2026",
                    "ideas": [{ "id": "i1", "text": "A" }, { "id": "i2", "text": "B" }],
                    "connections": [{ "from": "i1", "to": "i2", "label": "builds on", "fromName": "A" }],
                    "philosophers": [{ "name": "Plato" }]
                }],
                "cards": [
                    { "id": "c1", "front": "Metaphysics vs Ethics?", "back": "Real vs good", "interval": 6, "reviews": 3 },
                    { "id": "c2", "front": "Ethics standalone?", "back": "Yes", "interval": 6, "reviews": 2 }
                ]
            }"#,
        )
        .unwrap();

        let store = storage.load(Utc::now()).unwrap();
        let topic = store.topic(id_from_str("phil")).unwrap();
        assert_eq!(topic.status, TopicStatus::InProgress);
        assert_eq!(topic.last_review_date, NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(store.cards_for(topic.id).count(), 2);
        assert_eq!(store.card(id_from_str("c1")).unwrap().review_count, 3);

        // saving keeps the fields this version does not model
        storage.save(&store).unwrap();
        let saved: serde_json::Value = serde_json::from_slice(&fs::read(storage.store_path()).unwrap()).unwrap();
        assert_eq!(saved["topics"][0]["philosophers"][0]["name"], "Plato");
        assert_eq!(saved["topics"][0]["connections"][0]["fromName"], "A");
        assert_eq!(storage.load(Utc::now()).unwrap(), store);
    }
}
