//! Test helpers shared across Friday crates.

pub mod context;
pub mod desktop;
pub mod runner;
pub mod services;

pub use context::{TestSession, base_tool_context};
pub use desktop::RecordingDesktop;
pub use runner::{RecordingRunner, ScriptedRun};
pub use services::{RecordingMailer, StubWebProvider};
