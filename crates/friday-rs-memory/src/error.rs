//! Error types for memory operations.

/// Errors raised while reading or writing the memory document.
///
/// These never escape [`crate::MemoryStore`]'s public operations; the store
/// logs them and carries on with its in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
