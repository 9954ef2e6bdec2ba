//! JSON export and import
//!
//! Exports wrap the serialized store in an envelope:
//! ```json
//! { "exportDate": "2026-10-18T09:30:00Z", "version": "1", "data": { "topics": [], "cards": [] } }
//! ```
//! Imports are all-or-nothing: the payload is fully parsed and validated
//! before anything replaces the current store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::store::{EntityStore, StoreError};

/// Envelope format version written by this build
pub const EXPORT_VERSION: &str = "1";

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Could not parse import file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid import format: missing data.topics")]
    MissingTopics,

    #[error("Import contains inconsistent data: {0}")]
    Invalid(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub export_date: DateTime<Utc>,
    pub version: String,
    pub data: EntityStore,
}

/// Render the store as a pretty-printed export envelope
pub fn export_store(store: &EntityStore, now: DateTime<Utc>) -> serde_json::Result<String> {
    let envelope = ExportEnvelope {
        export_date: now,
        version: EXPORT_VERSION.to_string(),
        data: store.clone(),
    };
    serde_json::to_string_pretty(&envelope)
}

/// Suggested file name for an export taken at `now`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("learn-{}.json", now.timestamp_millis())
}

/// Parse and validate an export envelope, returning the store it carries
pub fn parse_import(text: &str) -> Result<EntityStore, ImportError> {
    let mut payload: Value = serde_json::from_str(text)?;

    let has_topics = payload
        .get("data")
        .and_then(|d| d.get("topics"))
        .map_or(false, Value::is_array);
    if !has_topics {
        return Err(ImportError::MissingTopics);
    }

    if let Some(version) = payload.get("version").and_then(Value::as_str) {
        if version != EXPORT_VERSION {
            log::warn!("Importing export version {} (current is {})", version, EXPORT_VERSION);
        }
    }

    let mut store: EntityStore = serde_json::from_value(payload["data"].take())?;
    store.adopt_unowned_cards();
    store.validate()?;
    Ok(store)
}
