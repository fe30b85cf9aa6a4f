//! Tool execution context and the boundary adapter.

use crate::Tool;
use crate::desktop::DesktopBackend;
use crate::mail::Mailer;
use crate::output_policy::ToolOutputPolicy;
use crate::web::WebProvider;
use friday_rs_config::ToolsConfig;
use friday_rs_exec::CommandRunner;
use friday_rs_memory::MemoryStore;
use friday_rs_protocol::{Capability, ToolError};
use futures_util::FutureExt;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Wait bounds for external commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolLimits {
    /// Bound for `run_command`.
    pub command_timeout: Duration,
    /// Bound for desktop, network, and power helper commands.
    pub helper_timeout: Duration,
}

impl Default for ToolLimits {
    fn default() -> Self {
        Self::from(&ToolsConfig::default())
    }
}

impl From<&ToolsConfig> for ToolLimits {
    fn from(config: &ToolsConfig) -> Self {
        Self {
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            helper_timeout: Duration::from_secs(config.helper_timeout_secs),
        }
    }
}

/// Shared service dependencies for a session (constructed once, shared via Arc).
pub struct ToolServices {
    /// Working directory used to resolve relative paths.
    pub cwd: PathBuf,
    /// Persistent memory store.
    pub memory: Arc<MemoryStore>,
    /// Process runner for capabilities that shell out.
    pub runner: Arc<dyn CommandRunner>,
    /// Mouse, keyboard, screen, and window backend.
    pub desktop: Arc<dyn DesktopBackend>,
    /// Optional web provider for weather and search.
    pub web: Option<Arc<dyn WebProvider>>,
    /// Optional mail transport.
    pub mailer: Option<Arc<dyn Mailer>>,
    /// Wait bounds for external commands.
    pub limits: ToolLimits,
    /// Output policy applied to tool results.
    pub output_policy: Option<ToolOutputPolicy>,
    /// Override for the XDG autostart directory.
    pub autostart_dir: Option<PathBuf>,
    /// Maximum number of web search results reported.
    pub search_limit: usize,
}

/// Shared context passed to tools during execution.
///
/// Per-invocation identity fields are stored directly.
/// Shared service references live behind an `Arc<ToolServices>` so cloning
/// per tool call is a cheap reference-count bump.
#[derive(Clone)]
pub struct ToolContext {
    /// Session id associated with the tool call.
    pub session_id: Uuid,
    /// Tool name for the current invocation.
    pub tool_name: Option<String>,
    /// Shared session-scoped services (cheap Arc clone).
    pub services: Arc<ToolServices>,
}

impl ToolContext {
    /// Create a context for a new session.
    pub fn new(services: Arc<ToolServices>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            tool_name: None,
            services,
        }
    }

    /// Apply the configured output policy to a tool result.
    pub fn apply_output_policy(&self, value: String) -> String {
        match self.services.output_policy.as_ref() {
            Some(policy) => policy.apply(value),
            None => value,
        }
    }

    /// Resolve a user-supplied path against the session working directory.
    pub fn resolve_path(&self, input: &str) -> PathBuf {
        let path = Path::new(input);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.services.cwd.join(path)
        }
    }

    /// Execute a tool and render every outcome, including panics, as text.
    pub async fn execute_tool(&mut self, tool: &dyn Tool, args: Value) -> String {
        let capability = tool.capability();
        self.tool_name = Some(tool.name().to_string());
        info!(
            "executing tool (name={}, session_id={})",
            capability, self.session_id
        );
        debug!("tool arguments (name={}, args_len={})", capability, args.to_string().len());

        let outcome = AssertUnwindSafe(tool.call(self, args)).catch_unwind().await;
        let output = match outcome {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                warn!(
                    "tool failed (name={}, session_id={}): {}",
                    capability, self.session_id, err
                );
                render_error(capability, &err)
            }
            Err(panic) => {
                error!(
                    "tool panicked (name={}, session_id={})",
                    capability, self.session_id
                );
                format!(
                    "{}: {}",
                    capability.failure_message(),
                    panic_message(panic.as_ref())
                )
            }
        };
        let output = self.apply_output_policy(output);
        debug!("tool finished (name={}, output_len={})", capability, output.len());
        output
    }
}

/// Render a tool error as the user-facing result string.
pub fn render_error(capability: Capability, err: &ToolError) -> String {
    if err.is_verbatim() {
        err.to_string()
    } else {
        format!("{}: {}", capability.failure_message(), err)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal error".to_string()
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("session_id", &self.session_id)
            .field("tool_name", &self.tool_name)
            .field("cwd", &self.services.cwd)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ToolContext, ToolLimits, ToolServices, render_error};
    use crate::Tool;
    use crate::desktop::XdoDesktop;
    use crate::output_policy::ToolOutputPolicy;
    use async_trait::async_trait;
    use friday_rs_exec::LocalCommandRunner;
    use friday_rs_memory::MemoryStore;
    use friday_rs_protocol::{Capability, ToolError};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn base_services(root: &Path) -> ToolServices {
        let runner = Arc::new(LocalCommandRunner::new());
        ToolServices {
            cwd: root.to_path_buf(),
            memory: Arc::new(MemoryStore::open(root.join("memory.json"))),
            runner: runner.clone(),
            desktop: Arc::new(XdoDesktop::new(runner, Duration::from_secs(1))),
            web: None,
            mailer: None,
            limits: ToolLimits::default(),
            output_policy: None,
            autostart_dir: None,
            search_limit: 5,
        }
    }

    #[derive(Debug)]
    struct ScriptedTool {
        outcome: fn() -> Result<String, ToolError>,
    }

    #[async_trait]
    impl Tool for ScriptedTool {
        fn capability(&self) -> Capability {
            Capability::RunCommand
        }

        fn args_schema(&self) -> Value {
            json!({})
        }

        async fn call(&self, _ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
            (self.outcome)()
        }
    }

    #[derive(Debug)]
    struct PanickingTool;

    #[async_trait]
    impl Tool for PanickingTool {
        fn capability(&self) -> Capability {
            Capability::GetSystemInfo
        }

        fn args_schema(&self) -> Value {
            json!({})
        }

        async fn call(&self, _ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
            panic!("sensor exploded");
        }
    }

    #[tokio::test]
    async fn execute_tool_passes_success_through() {
        let temp = tempdir().expect("tempdir");
        let mut ctx = ToolContext::new(Arc::new(base_services(temp.path())));
        let tool = ScriptedTool {
            outcome: || Ok("done".to_string()),
        };
        assert_eq!(ctx.execute_tool(&tool, json!({})).await, "done");
        assert_eq!(ctx.tool_name.as_deref(), Some("run_command"));
    }

    #[tokio::test]
    async fn execute_tool_prefixes_execution_failures() {
        let temp = tempdir().expect("tempdir");
        let mut ctx = ToolContext::new(Arc::new(base_services(temp.path())));
        let tool = ScriptedTool {
            outcome: || Err(ToolError::ExecutionFailed("disk on fire".to_string())),
        };
        assert_eq!(
            ctx.execute_tool(&tool, json!({})).await,
            "Failed to run command: disk on fire"
        );
    }

    #[tokio::test]
    async fn execute_tool_renders_validation_verbatim() {
        let temp = tempdir().expect("tempdir");
        let mut ctx = ToolContext::new(Arc::new(base_services(temp.path())));
        let tool = ScriptedTool {
            outcome: || Err(ToolError::InvalidArguments("Invalid action".to_string())),
        };
        assert_eq!(ctx.execute_tool(&tool, json!({})).await, "Invalid action");
    }

    #[tokio::test]
    async fn execute_tool_contains_panics() {
        let temp = tempdir().expect("tempdir");
        let mut ctx = ToolContext::new(Arc::new(base_services(temp.path())));
        let output = ctx.execute_tool(&PanickingTool, json!({})).await;
        assert_eq!(output, "Failed to get system information: sensor exploded");
    }

    #[tokio::test]
    async fn execute_tool_applies_output_policy() {
        let temp = tempdir().expect("tempdir");
        let mut services = base_services(temp.path());
        services.output_policy = Some(ToolOutputPolicy {
            max_chars: 2,
            truncation_marker: "~".to_string(),
        });
        let mut ctx = ToolContext::new(Arc::new(services));
        let tool = ScriptedTool {
            outcome: || Ok("done".to_string()),
        };
        assert_eq!(ctx.execute_tool(&tool, json!({})).await, "do~");
    }

    #[test]
    fn resolve_path_joins_relative_inputs() {
        let temp = tempdir().expect("tempdir");
        let ctx = ToolContext::new(Arc::new(base_services(temp.path())));
        assert_eq!(ctx.resolve_path("notes.txt"), temp.path().join("notes.txt"));
        assert_eq!(
            ctx.resolve_path("/etc/hostname"),
            Path::new("/etc/hostname").to_path_buf()
        );
    }

    #[test]
    fn render_error_matches_taxonomy() {
        assert_eq!(
            render_error(
                Capability::SendEmail,
                &ToolError::Unavailable("Gmail credentials not configured.".to_string())
            ),
            "Email sending failed: Gmail credentials not configured."
        );
        assert_eq!(
            render_error(
                Capability::RunCommand,
                &ToolError::TimedOut("Command timed out: sleep 60".to_string())
            ),
            "Command timed out: sleep 60"
        );
    }
}
