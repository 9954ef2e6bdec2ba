use std::path::Path;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use learntrack_lib::flashcards::Card;
use learntrack_lib::storage::FileStorage;
use learntrack_lib::topics::Topic;
use learntrack_lib::{StudyTracker, TrackerConfig};

/// Shared application state for CLI commands
pub struct App {
    pub config: TrackerConfig,
    pub storage: FileStorage,
    pub tracker: StudyTracker,
}

impl App {
    /// Load the config and the persisted store
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => TrackerConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => TrackerConfig::load_default().context("Failed to load config")?,
        };

        let storage = config.file_storage().context("Failed to get data directory")?;
        let store = storage
            .load(chrono::Utc::now())
            .with_context(|| format!("Failed to load data from {}", storage.store_path().display()))?;

        let tracker = StudyTracker::with_system_clock(store)
            .with_mastered_after_days(config.mastered_after_days);

        Ok(Self {
            config,
            storage,
            tracker,
        })
    }

    /// Write the store back to disk
    pub fn save(&self) -> Result<()> {
        if let Err(e) = self.storage.save(self.tracker.store()) {
            log::error!("Failed to save data: {}", e);
            return Err(e).context("Changes were applied but could not be saved");
        }
        Ok(())
    }

    /// Find a topic by id prefix, or by name (case-insensitive prefix match)
    pub fn find_topic(&self, query: &str) -> Result<Topic> {
        let topics = self.tracker.store().topics();
        let query_lower = query.to_lowercase();

        if let Ok(id) = match_id(topics.iter().map(|t| t.id), query) {
            if let Some(topic) = topics.iter().find(|t| t.id == id) {
                return Ok(topic.clone());
            }
        }

        // Exact name first
        if let Some(topic) = topics.iter().find(|t| t.name.to_lowercase() == query_lower) {
            return Ok(topic.clone());
        }

        let matches: Vec<&Topic> = topics.iter()
            .filter(|t| t.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No topic matching '{}'. Available topics:\n{}", query,
                topics.iter().map(|t| format!("  - {}", t.name)).collect::<Vec<_>>().join("\n")),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous topic name '{}'. Matches:\n{}", query,
                matches.iter().map(|t| format!("  - {}", t.name)).collect::<Vec<_>>().join("\n")),
        }
    }

    pub fn find_topic_opt(&self, query: Option<&str>) -> Result<Option<Topic>> {
        query.map(|q| self.find_topic(q)).transpose()
    }

    /// Find a card by id prefix
    pub fn find_card(&self, query: &str) -> Result<Card> {
        let cards = self.tracker.store().cards();
        let id = match_id(cards.iter().map(|c| c.id), query)
            .with_context(|| format!("No card matching '{}'", query))?;
        cards.iter()
            .find(|c| c.id == id)
            .cloned()
            .with_context(|| format!("No card matching '{}'", query))
    }

    /// Find a key idea of a topic by id prefix
    pub fn find_idea(&self, topic: &Topic, query: &str) -> Result<Uuid> {
        match_id(topic.ideas.iter().map(|i| i.id), query)
            .with_context(|| format!("No idea matching '{}' in {}", query, topic.name))
    }
}

/// Resolve a unique id prefix among `ids`
pub fn match_id(ids: impl IntoIterator<Item = Uuid>, query: &str) -> Result<Uuid> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        bail!("Empty id");
    }

    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&query))
        .collect();

    match matches.as_slice() {
        [] => bail!("No id starting with '{}'", query),
        [id] => Ok(*id),
        _ => bail!("Ambiguous id prefix '{}' ({} matches)", query, matches.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_id_prefix() {
        let a = Uuid::parse_str("1b4e28ba-2fa1-11d2-883f-0016d3cca427").unwrap();
        let b = Uuid::parse_str("1b4f0000-2fa1-11d2-883f-0016d3cca427").unwrap();

        assert_eq!(match_id([a, b], "1b4e").unwrap(), a);
        assert_eq!(match_id([a, b], "1B4F").unwrap(), b);
        assert_eq!(match_id([a, b], &a.to_string()).unwrap(), a);
        assert!(match_id([a, b], "1b4").is_err());
        assert!(match_id([a, b], "ff").is_err());
        assert!(match_id([a, b], " ").is_err());
    }
}
