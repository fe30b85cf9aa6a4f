//! Process execution for desktop automation: bounded command runs with
//! captured output, and detached launches for applications.

pub mod error;
pub mod runner;
pub mod types;

/// Exec error type.
pub use error::ExecError;
/// Runner trait and the host implementation.
pub use runner::{CommandRunner, LocalCommandRunner, stream_child_output};
/// Command specification and result types.
pub use types::{CommandResult, CommandSpec};
