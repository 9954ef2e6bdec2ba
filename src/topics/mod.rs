//! Study topics
//!
//! This module provides:
//! - Topic, phase and key-idea models
//! - Active-day streak tracking

pub mod models;
pub mod streak;

pub use models::*;
pub use streak::record_review;
