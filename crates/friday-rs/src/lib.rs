//! Public SDK surface for Friday.
//!
//! This crate binds the persona, the memory store, and the capability
//! registry into an [`AssistantSession`], serves that session to an external
//! dialogue engine over stdio, and provides a small initialization helper to
//! keep consumer setup consistent.

pub mod host;
pub mod prompt;
pub mod session;

/// Re-export for convenience.
pub use friday_rs_config as config;
/// Re-export for convenience.
pub use friday_rs_memory as memory;
/// Re-export for convenience.
pub use friday_rs_protocol as protocol;
/// Re-export for convenience.
pub use friday_rs_tools as tools;

pub use host::{handle_line, serve};
pub use prompt::{GREETING, build_instructions, session_instruction};
pub use session::{AssistantSession, SessionBuilder};

/// Initialize logging with env_logger.
///
/// Logs go to stderr with millisecond timestamps so stdout stays free for the
/// stdio host. `RUST_LOG` controls verbosity; the default is `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
