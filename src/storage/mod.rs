pub mod export;
pub mod legacy;
pub mod persistence;
mod store;
pub mod undo;

pub use export::{ExportEnvelope, ImportError};
pub use persistence::{FileStorage, PersistenceError};
pub use store::{EntityStore, StoreError};
pub use undo::{Snapshot, UndoManager};
