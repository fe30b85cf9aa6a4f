//! Configuration schema for Friday.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root config for the Friday assistant.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FridayConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub web: WebConfig,
}

impl FridayConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> FridayConfigBuilder {
        FridayConfigBuilder::new()
    }
}

/// Builder for assembling a `FridayConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct FridayConfigBuilder {
    config: FridayConfig,
}

impl FridayConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: FridayConfig::default(),
        }
    }

    /// Replace the assistant persona configuration.
    pub fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    /// Replace the memory configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the tool configuration.
    pub fn tools(mut self, tools: ToolsConfig) -> Self {
        self.config.tools = tools;
        self
    }

    /// Replace the email configuration.
    pub fn email(mut self, email: EmailConfig) -> Self {
        self.config.email = email;
        self
    }

    /// Replace the web provider configuration.
    pub fn web(mut self, web: WebConfig) -> Self {
        self.config.web = web;
        self
    }

    /// Finalize and return the built `FridayConfig`.
    pub fn build(self) -> FridayConfig {
        self.config
    }
}

/// Persona and voice settings handed to the dialogue engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_name")]
    pub name: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub additional_instruction_prompt: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            voice: default_voice(),
            temperature: default_temperature(),
            additional_instruction_prompt: None,
        }
    }
}

fn default_assistant_name() -> String {
    "Friday".to_string()
}

fn default_voice() -> String {
    "Aoede".to_string()
}

fn default_temperature() -> f32 {
    0.9
}

/// Location of the persisted memory document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_path")]
    pub path: PathBuf,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: default_memory_path(),
        }
    }
}

fn default_memory_path() -> PathBuf {
    PathBuf::from("friday_memory.json")
}

/// Tool catalog filtering and execution bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Capability names removed from the registry.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Upper bound for `run_command`.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Upper bound for desktop, network, and power helper commands.
    #[serde(default = "default_helper_timeout_secs")]
    pub helper_timeout_secs: u64,
    /// Override for the XDG autostart directory.
    #[serde(default)]
    pub autostart_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_policy: OutputPolicyConfig,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            deny: Vec::new(),
            command_timeout_secs: default_command_timeout_secs(),
            helper_timeout_secs: default_helper_timeout_secs(),
            autostart_dir: None,
            output_policy: OutputPolicyConfig::default(),
        }
    }
}

fn default_command_timeout_secs() -> u64 {
    30
}

fn default_helper_timeout_secs() -> u64 {
    15
}

/// Output policy applied to every tool result string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputPolicyConfig {
    #[serde(default = "default_max_result_chars")]
    pub max_result_chars: usize,
    #[serde(default = "default_truncation_marker")]
    pub truncation_marker: String,
}

impl Default for OutputPolicyConfig {
    fn default() -> Self {
        Self {
            max_result_chars: default_max_result_chars(),
            truncation_marker: default_truncation_marker(),
        }
    }
}

fn default_max_result_chars() -> usize {
    32 * 1024
}

fn default_truncation_marker() -> String {
    "\n... (output truncated)".to_string()
}

/// SMTP relay settings. Credentials are read from the environment at send time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_username_env")]
    pub username_env: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username_env: default_username_env(),
            password_env: default_password_env(),
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_username_env() -> String {
    "GMAIL_USER".to_string()
}

fn default_password_env() -> String {
    "GMAIL_APP_PASSWORD".to_string()
}

/// Endpoints for the weather and search providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WebConfig {
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_web_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            search_url: default_search_url(),
            timeout_secs: default_web_timeout_secs(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_weather_url() -> String {
    "https://wttr.in".to_string()
}

fn default_search_url() -> String {
    "https://api.duckduckgo.com/".to_string()
}

fn default_web_timeout_secs() -> u64 {
    15
}

fn default_search_limit() -> usize {
    5
}
