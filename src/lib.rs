pub mod clock;
pub mod config;
pub mod flashcards;
pub mod storage;
pub mod topics;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TrackerConfig;
pub use tracker::StudyTracker;
