//! Tests for layered configuration loading.

use super::*;
use crate::{MemoryConfig, ToolsConfig};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options rooted in a temp dir so the real home directory is never read.
fn isolated_options(root: &Path) -> LayeredConfigOptions {
    LayeredConfigOptions {
        cwd: root.join("cwd"),
        user_config_path: Some(root.join("user").join(DEFAULT_CONFIG_FILE)),
        runtime_paths: Vec::new(),
    }
}

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = FridayConfig::load_from_str("{}").expect("config");
    assert_eq!(config, FridayConfig::default());
    assert_eq!(config.assistant.name, "Friday");
    assert_eq!(config.assistant.voice, "Aoede");
    assert_eq!(config.memory.path, PathBuf::from("friday_memory.json"));
    assert_eq!(config.tools.command_timeout_secs, 30);
    assert_eq!(config.email.smtp_host, "smtp.gmail.com");
    assert_eq!(config.email.smtp_port, 587);
    assert_eq!(config.email.username_env, "GMAIL_USER");
    assert_eq!(config.web.weather_url, "https://wttr.in");
}

/// JSON5 comments and unquoted keys are accepted.
#[test]
fn parse_json5_syntax() {
    let json5 = r#"{
        // keep the memory next to the binary
        memory: { path: "state/memory.json" },
        tools: { deny: ["power_management"], command_timeout_secs: 10, },
    }"#;
    let config = FridayConfig::load_from_str(json5).expect("config");
    assert_eq!(config.memory.path, PathBuf::from("state/memory.json"));
    assert_eq!(config.tools.deny, vec!["power_management".to_string()]);
    assert_eq!(config.tools.command_timeout_secs, 10);
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = FridayConfig::load_from_str("{ unexpected: true }").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown field"), "{msg}");
}

/// Reject deny entries that do not name a capability.
#[test]
fn rejects_unknown_denied_capability() {
    let err = FridayConfig::load_from_str(r#"{ tools: { deny: ["teleport"] } }"#).unwrap_err();
    match err {
        ConfigError::InvalidField { path, message } => {
            assert_eq!(path, "tools.deny");
            assert!(message.contains("teleport"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Reject zero timeouts.
#[test]
fn rejects_zero_command_timeout() {
    let err =
        FridayConfig::load_from_str("{ tools: { command_timeout_secs: 0 } }").unwrap_err();
    assert!(format!("{err}").contains("tools.command_timeout_secs"));
}

/// Reject temperatures outside the model range.
#[test]
fn rejects_out_of_range_temperature() {
    let err = FridayConfig::load_from_str("{ assistant: { temperature: 3.5 } }").unwrap_err();
    assert!(format!("{err}").contains("assistant.temperature"));
}

/// Reject non-http provider endpoints.
#[test]
fn rejects_non_http_weather_url() {
    let err = FridayConfig::load_from_str(r#"{ web: { weather_url: "ftp://wttr.in" } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("web.weather_url"));
}

/// Cwd config overrides user config, runtime overrides both.
#[test]
fn layered_config_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let mut options = isolated_options(root);

    write_json5(
        options.user_config_path.as_ref().expect("user path"),
        r#"{ assistant: { voice: "Charon" }, memory: { path: "user.json" } }"#,
    );
    write_json5(
        &options.cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ memory: { path: "cwd.json" }, web: { search_limit: 3 } }"#,
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, "{ web: { search_limit: 8 } }");
    options = options.with_runtime_path(&runtime);

    let layered = FridayConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.assistant.voice, "Charon");
    assert_eq!(layered.config.memory.path, PathBuf::from("cwd.json"));
    assert_eq!(layered.config.web.search_limit, 8);
    let sources = layered
        .layers
        .iter()
        .map(|layer| layer.source)
        .collect::<Vec<_>>();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Runtime,
        ]
    );
}

/// Missing optional layers fall back to defaults.
#[test]
fn layered_config_without_files_uses_defaults() {
    let temp = TempDir::new().expect("tmp");
    let layered =
        FridayConfig::load_layered_with_options(isolated_options(temp.path())).expect("layered");
    assert_eq!(layered.config, FridayConfig::default());
    assert!(layered.layers.is_empty());
}

/// Missing runtime layers are an error.
#[test]
fn layered_config_requires_runtime_file() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = FridayConfig::load_layered_with_options(options).unwrap_err();
    match err {
        ConfigError::MissingFile(path) => assert_eq!(path, temp.path().join("nope.json5")),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// A broken discovered layer is skipped; the remaining layers still apply.
#[test]
fn broken_optional_layers_are_skipped() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path());
    write_json5(
        options.user_config_path.as_ref().expect("user path"),
        r#"{ assistant: { voice: "Charon" } }"#,
    );
    write_json5(&options.cwd.join(DEFAULT_CONFIG_FILE), "{ memory: { path: ");

    let layered = FridayConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.assistant.voice, "Charon");
    assert_eq!(layered.config.memory.path, PathBuf::from("friday_memory.json"));
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.layers[0].source, ConfigLayerSource::User);
}

/// An optional layer with a field that fails validation is skipped too.
#[test]
fn invalid_optional_layer_is_skipped() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path());
    write_json5(
        &options.cwd.join(DEFAULT_CONFIG_FILE),
        "{ tools: { command_timeout_secs: 0 } }",
    );
    let layered = FridayConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config, FridayConfig::default());
    assert!(layered.layers.is_empty());
}

/// A broken runtime layer stays fatal.
#[test]
fn broken_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let runtime = temp.path().join("runtime.json5");
    write_json5(&runtime, "{ memory: ");
    let options = isolated_options(temp.path()).with_runtime_path(&runtime);
    let err = FridayConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed(_)), "{err:?}");
}

/// Builder output passes validation.
#[test]
fn builder_produces_valid_config() {
    let config = FridayConfig::builder()
        .memory(MemoryConfig {
            path: PathBuf::from("custom.json"),
        })
        .tools(ToolsConfig {
            deny: vec!["run_command".to_string()],
            ..ToolsConfig::default()
        })
        .build();
    config.validate().expect("valid");
    assert_eq!(config.memory.path, PathBuf::from("custom.json"));
}
