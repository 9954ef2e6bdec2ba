//! Lenient readers for identifiers and dates written by older versions of
//! the tracker.
//!
//! Older stores used short ad-hoc ids (`"phil"`, `"c1"`, `"t1718000000000"`)
//! and JavaScript `Date.toDateString()` days (`"Sun Oct 18 2026"`). Ids that
//! are not UUIDs are mapped to name-based v5 UUIDs so that every reference
//! to the same legacy id resolves to the same UUID.

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use uuid::Uuid;

/// Namespace for ids migrated from the legacy format
const LEGACY_NAMESPACE: Uuid = Uuid::from_u128(0x6c74_5f64_6174_4a4f_8d2e_9b1c_53a0_7e11);

/// Legacy day format produced by `Date.toDateString()`
const LEGACY_DAY_FORMAT: &str = "%a %b %d %Y";

/// Map a stored id to a UUID, migrating legacy ids
pub fn id_from_str(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v5(&LEGACY_NAMESPACE, raw.as_bytes()))
}

/// Parse a stored review day in either the current or the legacy format
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, LEGACY_DAY_FORMAT))
        .ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_uuid(self) -> Uuid {
        match self {
            RawId::Text(s) => id_from_str(&s),
            RawId::Number(n) => id_from_str(&n.to_string()),
        }
    }
}

/// `deserialize_with` helper for id fields
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_uuid)
}

/// `deserialize_with` helper for optional review days
pub fn deserialize_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_day(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid review date: {}", raw))),
    }
}
