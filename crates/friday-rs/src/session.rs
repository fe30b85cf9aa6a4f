//! Assistant session: persona, memory store, and capability registry.

use crate::prompt::{build_instructions, session_instruction};
use autoagents_core::tool::ToolT;
use friday_rs_config::FridayConfig;
use friday_rs_exec::{CommandRunner, LocalCommandRunner};
use friday_rs_memory::MemoryStore;
use friday_rs_protocol::ToolDescriptor;
use friday_rs_tools::{
    DesktopBackend, HttpWebProvider, Mailer, SmtpMailer, ToolContext, ToolLimits,
    ToolOutputPolicy, ToolRegistry, ToolServices, WebProvider, XdoDesktop,
    builtin_tool_registry_with_deny, tools_to_adaptors,
};
use log::{info, warn};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`AssistantSession`] with overridable service backends.
pub struct SessionBuilder {
    config: FridayConfig,
    cwd: Option<PathBuf>,
    runner: Option<Arc<dyn CommandRunner>>,
    desktop: Option<Arc<dyn DesktopBackend>>,
    web: Option<Arc<dyn WebProvider>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl SessionBuilder {
    /// Start a builder from a loaded config.
    pub fn new(config: FridayConfig) -> Self {
        Self {
            config,
            cwd: None,
            runner: None,
            desktop: None,
            web: None,
            mailer: None,
        }
    }

    /// Working directory for relative paths and the memory file.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Override the process runner.
    pub fn runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Override the desktop backend.
    pub fn desktop(mut self, desktop: Arc<dyn DesktopBackend>) -> Self {
        self.desktop = Some(desktop);
        self
    }

    /// Override the web provider.
    pub fn web(mut self, web: Arc<dyn WebProvider>) -> Self {
        self.web = Some(web);
        self
    }

    /// Override the mail transport.
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Build the session, opening the memory store and registering tools.
    pub fn build(self) -> AssistantSession {
        let Self {
            config,
            cwd,
            runner,
            desktop,
            web,
            mailer,
        } = self;
        let cwd = cwd
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let limits = ToolLimits::from(&config.tools);

        let runner = runner.unwrap_or_else(|| Arc::new(LocalCommandRunner::new()));
        let desktop = desktop
            .unwrap_or_else(|| Arc::new(XdoDesktop::new(runner.clone(), limits.helper_timeout)));
        let web = web.or_else(|| match HttpWebProvider::new(&config.web) {
            Ok(provider) => Some(Arc::new(provider) as Arc<dyn WebProvider>),
            Err(err) => {
                warn!("web provider unavailable: {}", err);
                None
            }
        });
        let mailer = mailer.unwrap_or_else(|| {
            Arc::new(SmtpMailer::new(
                config.email.clone(),
                Duration::from_secs(config.web.timeout_secs),
            ))
        });

        let memory_path = if config.memory.path.is_absolute() {
            config.memory.path.clone()
        } else {
            cwd.join(&config.memory.path)
        };
        let memory = Arc::new(MemoryStore::open(&memory_path));
        let registry = builtin_tool_registry_with_deny(&config.tools.deny);

        let services = ToolServices {
            cwd,
            memory: memory.clone(),
            runner,
            desktop,
            web,
            mailer: Some(mailer),
            limits,
            output_policy: Some(ToolOutputPolicy::from(&config.tools.output_policy)),
            autostart_dir: config.tools.autostart_dir.clone(),
            search_limit: config.web.search_limit,
        };
        let ctx = ToolContext::new(Arc::new(services));
        info!(
            "session ready (session_id={}, tools={}, memory={})",
            ctx.session_id,
            registry.len(),
            memory_path.display()
        );

        AssistantSession {
            config,
            registry,
            memory,
            ctx,
        }
    }
}

/// One assistant session: a single memory store and the registered capabilities.
pub struct AssistantSession {
    config: FridayConfig,
    registry: ToolRegistry,
    memory: Arc<MemoryStore>,
    ctx: ToolContext,
}

impl AssistantSession {
    /// Build a session with default backends.
    pub fn new(config: FridayConfig) -> Self {
        SessionBuilder::new(config).build()
    }

    /// Invoke a capability by name. Every outcome is a single string.
    pub async fn invoke(&self, name: &str, arguments: Value) -> String {
        self.registry.invoke(&self.ctx, name, arguments).await
    }

    /// Record a completed exchange in the conversation log.
    pub fn record_turn(&self, user: &str, assistant: &str) {
        self.memory.add_conversation(user, assistant);
    }

    /// Name, description, and schema of every registered capability.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.registry
            .specs()
            .into_iter()
            .map(ToolDescriptor::from)
            .collect()
    }

    /// System instructions built from the persona, the registered tools, and
    /// the current memory.
    pub fn instructions(&self) -> String {
        build_instructions(
            &self.config.assistant,
            &self.memory.snapshot(),
            &self.descriptors(),
        )
    }

    /// First-turn instruction carrying the greeting.
    pub fn session_instruction(&self) -> String {
        session_instruction(&self.config.assistant.name)
    }

    /// Wrap every registered capability for an AutoAgents agent.
    pub fn adaptors(&self) -> Vec<Arc<dyn ToolT>> {
        tools_to_adaptors(self.registry.all(), &self.ctx)
    }

    /// Session memory store.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Loaded configuration.
    pub fn config(&self) -> &FridayConfig {
        &self.config
    }

    /// Capability registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::SessionBuilder;
    use friday_rs_config::{FridayConfig, ToolsConfig};
    use friday_rs_test_utils::{RecordingDesktop, RecordingRunner, StubWebProvider};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn builder(dir: &tempfile::TempDir, config: FridayConfig) -> SessionBuilder {
        SessionBuilder::new(config)
            .cwd(dir.path())
            .runner(Arc::new(RecordingRunner::new()))
            .desktop(Arc::new(RecordingDesktop::new()))
            .web(Arc::new(StubWebProvider::new()))
    }

    #[tokio::test]
    async fn memory_lives_under_session_cwd() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = builder(&dir, FridayConfig::default()).build();
        let output = session
            .invoke("remember_information", json!({"key": "theme", "value": "dark"}))
            .await;
        assert_eq!(output, "I'll remember that theme: dark");
        assert!(dir.path().join("friday_memory.json").is_file());
        assert!(session.instructions().contains("- Preference theme: dark"));
    }

    #[tokio::test]
    async fn denied_tools_are_not_listed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = FridayConfig::builder()
            .tools(ToolsConfig {
                deny: vec!["run_command".to_string()],
                ..ToolsConfig::default()
            })
            .build();
        let session = builder(&dir, config).build();
        let names = session
            .descriptors()
            .into_iter()
            .map(|descriptor| descriptor.name)
            .collect::<Vec<_>>();
        assert_eq!(names.len(), 29);
        assert!(!names.contains(&"run_command".to_string()));
        assert_eq!(session.adaptors().len(), 29);
        let instructions = session.instructions();
        assert!(!instructions.contains("- run_command:"), "{instructions}");
        assert!(instructions.contains("- get_weather:"));
    }

    #[test]
    fn record_turn_appends_to_log() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = builder(&dir, FridayConfig::default()).build();
        session.record_turn("hello", "Good evening, sir.");
        let conversations = session.memory().conversations();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].assistant, "Good evening, sir.");
    }
}
