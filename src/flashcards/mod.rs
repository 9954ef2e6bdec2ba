//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - The card model with its scheduling state
//! - Simplified SM-2 scheduling and grading
//! - Due-set selection
//! - Review statistics

pub mod algorithm;
pub mod due;
pub mod models;
pub mod review;
pub mod stats;

pub use algorithm::{format_interval, Grade};
pub use due::{due_cards, due_count};
pub use models::*;
pub use review::grade;
pub use stats::review_stats;
