//! File-backed memory store.
//!
//! The store loads the document once, keeps it resident, and rewrites the
//! whole file after every mutation. Every public operation is fail-soft: IO
//! and decode errors are logged and never returned.
//!
//! The in-process lock serializes mutations, but there is no cross-process
//! locking. Only one process may write a given memory file at a time.

use crate::error::MemoryError;
use crate::model::{ConversationRecord, MemoryDocument, ReminderRecord, TaskRecord, now};
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Shared memory store backed by a single pretty-printed JSON file.
#[derive(Debug)]
pub struct MemoryStore {
    /// Storage location of the document.
    path: PathBuf,
    /// Resident copy of the document.
    document: RwLock<MemoryDocument>,
}

impl MemoryStore {
    /// Open a store at `path`, loading any existing document.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let document = Self::load(&path);
        info!(
            "opened memory store (path={}, conversations={}, preferences={}, tasks={}, reminders={})",
            path.display(),
            document.conversations.len(),
            document.user_preferences.len(),
            document.tasks.len(),
            document.reminders.len()
        );
        Self {
            path,
            document: RwLock::new(document),
        }
    }

    /// Read the document at `path`. Absent, unreadable, or malformed files
    /// yield an empty document.
    pub fn load(path: &Path) -> MemoryDocument {
        if !path.exists() {
            debug!("memory file missing (path={})", path.display());
            return MemoryDocument::default();
        }
        match read_document(path) {
            Ok(document) => document,
            Err(err) => {
                error!(
                    "error loading memory, starting empty (path={}): {}",
                    path.display(),
                    err
                );
                MemoryDocument::default()
            }
        }
    }

    /// Storage location of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current document to disk, logging any failure.
    pub fn save(&self) {
        let document = self.document.read();
        self.persist(&document);
    }

    /// Write the current document to disk and report the outcome.
    pub fn try_save(&self) -> Result<(), MemoryError> {
        let document = self.document.read();
        write_document(&self.path, &document)
    }

    /// Insert or overwrite a preference.
    pub fn set_preference(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let mut document = self.document.write();
        document.user_preferences.insert(key.clone(), value.into());
        debug!("preference stored (key_len={})", key.len());
        self.persist(&document);
    }

    /// Look up a preference.
    pub fn get_preference(&self, key: &str) -> Option<String> {
        self.document.read().user_preferences.get(key).cloned()
    }

    /// Append a timestamped exchange, keeping only the most recent entries.
    pub fn add_conversation(&self, user: impl Into<String>, assistant: impl Into<String>) {
        let mut document = self.document.write();
        document.push_conversation(ConversationRecord {
            timestamp: now(),
            user: user.into(),
            assistant: assistant.into(),
        });
        debug!(
            "conversation recorded (total={})",
            document.conversations.len()
        );
        self.persist(&document);
    }

    /// Append an incomplete task.
    pub fn add_task(&self, task: impl Into<String>) {
        let mut document = self.document.write();
        document.tasks.push(TaskRecord {
            task: task.into(),
            timestamp: now(),
            completed: false,
        });
        debug!("task recorded (total={})", document.tasks.len());
        self.persist(&document);
    }

    /// Append a reminder with an optional free-text due time.
    pub fn add_reminder(&self, reminder: impl Into<String>, datetime: Option<String>) {
        let mut document = self.document.write();
        document.reminders.push(ReminderRecord {
            reminder: reminder.into(),
            datetime,
            created: now(),
        });
        debug!("reminder recorded (total={})", document.reminders.len());
        self.persist(&document);
    }

    /// Deep copy of the current document.
    pub fn snapshot(&self) -> MemoryDocument {
        self.document.read().clone()
    }

    /// Conversation log, oldest first.
    pub fn conversations(&self) -> Vec<ConversationRecord> {
        self.document.read().conversations.clone()
    }

    /// Preference map.
    pub fn preferences(&self) -> BTreeMap<String, String> {
        self.document.read().user_preferences.clone()
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> Vec<TaskRecord> {
        self.document.read().tasks.clone()
    }

    /// Reminders in insertion order.
    pub fn reminders(&self) -> Vec<ReminderRecord> {
        self.document.read().reminders.clone()
    }

    /// Persist a document, logging failures. In-memory state is kept either way.
    fn persist(&self, document: &MemoryDocument) {
        if let Err(err) = write_document(&self.path, document) {
            error!(
                "error saving memory (path={}): {}",
                self.path.display(),
                err
            );
        }
    }
}

fn read_document(path: &Path) -> Result<MemoryDocument, MemoryError> {
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        warn!("memory file empty (path={})", path.display());
        return Ok(MemoryDocument::default());
    }
    Ok(serde_json::from_str(&contents)?)
}

/// Rewrite the document atomically via a sibling temp file.
fn write_document(path: &Path, document: &MemoryDocument) -> Result<(), MemoryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let temp_path = temp_path(path);
    let result = write_and_replace(&temp_path, path, document);
    if result.is_err()
        && let Err(err) = fs::remove_file(&temp_path)
        && err.kind() != ErrorKind::NotFound
    {
        warn!(
            "failed to remove temp memory file (path={}): {}",
            temp_path.display(),
            err
        );
    }
    result
}

fn write_and_replace(
    temp_path: &Path,
    path: &Path,
    document: &MemoryDocument,
) -> Result<(), MemoryError> {
    {
        let mut file = fs::File::create(temp_path)?;
        serde_json::to_writer_pretty(&mut file, document)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
    }
    fs::rename(temp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("memory.json"));
    name.push(".tmp");
    path.with_file_name(name)
}
