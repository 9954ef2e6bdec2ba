//! Simplified SM-2 spaced repetition scheduling
//!
//! Quality ratings are integers; 3 and above count as a successful recall.
//! The canonical inputs are Again (1), Good (3) and Easy (5).
//!
//! On success the ease factor moves by `(quality - 3) * 0.1` and the
//! interval grows by the new ease factor, except that a card still on a
//! one-day interval graduates straight to six days. On a lapse the interval
//! drops back to one day and the ease factor takes a further 0.2 penalty.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::models::Card;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of a new card
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Minimum interval in days
pub const MIN_INTERVAL: u32 = 1;

/// Upper bound on intervals so due dates stay representable
pub const MAX_INTERVAL: u32 = 36_500;

/// Interval a learning card jumps to on its first successful recall
const GRADUATING_INTERVAL: u32 = 6;

/// Lowest quality counted as a successful recall
const PASSING_QUALITY: i32 = 3;

const EASE_STEP: f64 = 0.1;
const LAPSE_PENALTY: f64 = 0.2;

/// Canonical review grades offered by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grade {
    Again,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Again, Grade::Good, Grade::Easy];

    pub fn quality(self) -> i32 {
        match self {
            Grade::Again => 1,
            Grade::Good => 3,
            Grade::Easy => 5,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "again" => Some(Grade::Again),
            "good" => Some(Grade::Good),
            "easy" => Some(Grade::Easy),
            _ => None,
        }
    }
}

/// Result of calculating the next review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub interval: u32,
    pub ease_factor: f64,
    pub next_review_at: DateTime<Utc>,
}

/// Calculate the next interval, ease factor and due time for a card graded
/// with `quality` at `now`.
pub fn calculate_next_review<Tz: TimeZone>(card: &Card, quality: i32, now: &DateTime<Tz>) -> ReviewResult {
    // f64 keeps the whole i32 range representable without overflow
    let adjusted = card.ease + (f64::from(quality) - f64::from(PASSING_QUALITY)) * EASE_STEP;
    let mut ease_factor = adjusted.max(MIN_EASE_FACTOR);

    let interval = if quality >= PASSING_QUALITY {
        if card.interval <= MIN_INTERVAL {
            GRADUATING_INTERVAL
        } else {
            // `as` saturates, the clamp below keeps us in range
            (f64::from(card.interval) * ease_factor).round() as u32
        }
    } else {
        ease_factor = (ease_factor - LAPSE_PENALTY).max(MIN_EASE_FACTOR);
        MIN_INTERVAL
    };
    let interval = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);

    ReviewResult {
        interval,
        ease_factor,
        next_review_at: now.with_timezone(&Utc) + Duration::days(i64::from(interval)),
    }
}

/// The intervals Again, Good and Easy would produce, in that order
pub fn preview_intervals<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>) -> [u32; 3] {
    Grade::ALL.map(|grade| calculate_next_review(card, grade.quality(), now).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
