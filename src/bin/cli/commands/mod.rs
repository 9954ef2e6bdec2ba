pub mod cards;
pub mod review;
pub mod stats;
pub mod topics;
pub mod transfer;
