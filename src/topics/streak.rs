//! Streak bookkeeping for topics
//!
//! A topic's streak counts the calendar days on which at least one of its
//! cards was graded. Days do not need to be adjacent: reviewing once a week
//! still advances the streak on every visit.

use chrono::{DateTime, NaiveDate, TimeZone};
use uuid::Uuid;

use super::models::Topic;
use crate::storage::EntityStore;

impl Topic {
    /// Credit a review on `day`. Returns false if the day was already credited.
    pub fn credit_day(&mut self, day: NaiveDate) -> bool {
        if self.last_review_date == Some(day) {
            return false;
        }
        self.streak += 1;
        self.last_review_date = Some(day);
        true
    }
}

/// Record a review event for a topic at `now`.
///
/// The day is taken in `now`'s own offset. Missing topics are ignored.
pub fn record_review<Tz: TimeZone>(store: &mut EntityStore, topic_id: Uuid, now: &DateTime<Tz>) -> bool {
    let day = now.date_naive();
    let Some(topic) = store.topic_mut(topic_id) else {
        log::warn!("Review recorded for unknown topic {}", topic_id);
        return false;
    };

    let credited = topic.credit_day(day);
    if credited {
        log::debug!("Topic {} streak is now {} ({})", topic_id, topic.streak, day);
    }
    credited
}
