//! Data models for study topics

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::legacy::{deserialize_day, deserialize_id};

/// Overall progress of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    #[default]
    NotStarted,
    #[serde(alias = "active")]
    InProgress,
    Complete,
}

/// Progress of a single phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
}

/// One step on a topic's linear progress track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub status: PhaseStatus,
}

/// A key idea noted while studying a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyIdea {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Uuid,
    pub text: String,
}

impl KeyIdea {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
        }
    }
}

/// A labelled link between two key ideas of the same topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(deserialize_with = "deserialize_id")]
    pub from: Uuid,
    #[serde(deserialize_with = "deserialize_id")]
    pub to: Uuid,
    #[serde(default)]
    pub label: String,
    /// Fields this version does not model (e.g. `fromName`)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Connection {
    pub fn new(from: Uuid, to: Uuid, label: String) -> Self {
        Self {
            from,
            to,
            label,
            extra: serde_json::Map::new(),
        }
    }
}

/// A subject being studied. Owns its phases, positions and key ideas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default)]
    pub status: TopicStatus,
    /// Fixed order, never reordered after creation
    #[serde(default)]
    pub phases: Vec<Phase>,
    /// Position name -> the user's current position
    #[serde(default)]
    pub positions: BTreeMap<String, String>,
    #[serde(default)]
    pub ideas: Vec<KeyIdea>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of distinct days with at least one graded review
    #[serde(default)]
    pub streak: u32,
    #[serde(
        default,
        alias = "lastReview",
        deserialize_with = "deserialize_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_review_date: Option<NaiveDate>,
    /// Fields this version does not model (quotes, experiments, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Topic {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: String::new(),
            status: TopicStatus::NotStarted,
            phases: vec![Phase {
                id: 1,
                name: "Getting Started".to_string(),
                status: PhaseStatus::Pending,
            }],
            positions: BTreeMap::new(),
            ideas: Vec::new(),
            connections: Vec::new(),
            tags: Vec::new(),
            streak: 0,
            last_review_date: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn has_idea(&self, idea_id: Uuid) -> bool {
        self.ideas.iter().any(|i| i.id == idea_id)
    }

    /// Completed phases over total phases
    pub fn progress(&self) -> (usize, usize) {
        let completed = self
            .phases
            .iter()
            .filter(|p| p.status == PhaseStatus::Complete)
            .count();
        (completed, self.phases.len())
    }
}

/// Request to update a topic's editable fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TopicStatus>,
    pub tags: Option<Vec<String>>,
}

impl TopicUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.tags.is_none()
    }

    /// Apply the update in place
    pub fn apply(self, topic: &mut Topic) {
        if let Some(name) = self.name {
            topic.name = name;
        }
        if let Some(description) = self.description {
            topic.description = description;
        }
        if let Some(status) = self.status {
            topic.status = status;
        }
        if let Some(tags) = self.tags {
            topic.tags = tags;
        }
    }
}
