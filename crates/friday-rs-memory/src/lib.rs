//! Persistent assistant memory: preferences, a bounded conversation log,
//! tasks, and reminders kept in a single JSON document.

pub mod error;
pub mod model;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Memory document model.
pub use model::{
    ConversationRecord, MAX_CONVERSATIONS, MemoryDocument, ReminderRecord, TaskRecord,
};
/// File-backed memory store.
pub use store::MemoryStore;
