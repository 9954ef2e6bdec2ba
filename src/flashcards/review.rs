//! Applying a graded review to the store

use chrono::{DateTime, TimeZone};
use uuid::Uuid;

use super::algorithm::{calculate_next_review, ReviewResult};
use super::models::Card;
use crate::storage::EntityStore;
use crate::topics::streak;

/// Grade a card at `now` and credit the owning topic's streak.
///
/// Returns the updated card, or `None` (leaving the store untouched) when
/// the card does not exist.
pub fn grade<Tz: TimeZone>(
    store: &mut EntityStore,
    card_id: Uuid,
    quality: i32,
    now: &DateTime<Tz>,
) -> Option<Card> {
    let Some(card) = store.card_mut(card_id) else {
        log::warn!("Ignoring grade for unknown card {}", card_id);
        return None;
    };

    let ReviewResult {
        interval,
        ease_factor,
        next_review_at,
    } = calculate_next_review(card, quality, now);

    card.interval = interval;
    card.ease = ease_factor;
    card.next_review_at = next_review_at;
    card.review_count += 1;
    let updated = card.clone();

    log::debug!(
        "Graded card {} with quality {}: interval {}d, ease {:.2}",
        card_id,
        quality,
        interval,
        ease_factor
    );

    streak::record_review(store, updated.topic_id, now);
    Some(updated)
}
