//! Memory document model.
//!
//! Field names match the on-disk JSON keys so documents written by earlier
//! assistant versions load unchanged.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of conversation records retained in the log.
pub const MAX_CONVERSATIONS: usize = 50;

/// Root persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    /// Conversation log, oldest first.
    #[serde(default)]
    pub conversations: Vec<ConversationRecord>,
    /// Preference map, last write wins.
    #[serde(default)]
    pub user_preferences: BTreeMap<String, String>,
    /// Tasks in insertion order.
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    /// Reminders in insertion order.
    #[serde(default)]
    pub reminders: Vec<ReminderRecord>,
}

/// One user/assistant exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub timestamp: NaiveDateTime,
    pub user: String,
    pub assistant: String,
}

/// A tracked task. Nothing exposed flips `completed` yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task: String,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub completed: bool,
}

/// A reminder with an optional free-text due time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub reminder: String,
    #[serde(default)]
    pub datetime: Option<String>,
    pub created: NaiveDateTime,
}

/// Local wall-clock time without offset.
pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl MemoryDocument {
    /// Append a conversation record and drop the oldest entries beyond the cap.
    pub fn push_conversation(&mut self, record: ConversationRecord) {
        self.conversations.push(record);
        if self.conversations.len() > MAX_CONVERSATIONS {
            let excess = self.conversations.len() - MAX_CONVERSATIONS;
            self.conversations.drain(..excess);
        }
    }
}
