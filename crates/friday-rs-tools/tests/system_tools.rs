//! Command, file, volume, network, power, and startup capability tests.

use friday_rs_test_utils::{RecordingDesktop, RecordingRunner, ScriptedRun, TestSession};
use friday_rs_tools::builtin_tool_registry;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn run_command_reports_status_and_output() {
    let session = TestSession::new();
    session.runner.script(ScriptedRun::stdout("hello\n"));
    let output = builtin_tool_registry()
        .invoke(&session.context(), "run_command", json!({"command": "echo hello"}))
        .await;
    assert_eq!(output, "Command: echo hello\nReturn code: 0\nOutput:\nhello\n\n");

    let spec = session.runner.last_run().expect("recorded run");
    assert_eq!(spec.display(), "sh -c echo hello");
    assert_eq!(spec.cwd.as_deref(), Some(session.dir.path()));
    assert_eq!(spec.timeout, Some(Duration::from_secs(2)));
}

#[tokio::test]
async fn run_command_timeout_is_verbatim() {
    let session = TestSession::new();
    session.runner.script(ScriptedRun::TimedOut);
    let output = builtin_tool_registry()
        .invoke(&session.context(), "run_command", json!({"command": "sleep 60"}))
        .await;
    assert_eq!(output, "Command timed out: sleep 60");
}

#[tokio::test]
async fn run_command_direct_mode_reports_missing_program() {
    let session = TestSession::new();
    session.runner.script(ScriptedRun::NotFound);
    let output = builtin_tool_registry()
        .invoke(
            &session.context(),
            "run_command",
            json!({"command": "nosuchtool --flag", "shell": "false"}),
        )
        .await;
    assert_eq!(output, "Failed to run command: command not found: nosuchtool");
}

#[tokio::test]
async fn file_tools_round_trip_in_session_dir() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();

    assert_eq!(
        registry
            .invoke(
                &ctx,
                "create_file",
                json!({"file_path": "notes/today.txt", "content": "abcdef"}),
            )
            .await,
        "Created file: notes/today.txt with 6 characters"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "read_file_content",
                json!({"file_path": "notes/today.txt", "max_chars": "3"}),
            )
            .await,
        "Content of notes/today.txt:\nabc\n... (truncated, file is larger than 3 chars)"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "list_directory", json!({"directory_path": "notes"}))
            .await,
        "Contents of notes:\n📄 today.txt (6 bytes)"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "delete_file", json!({"file_path": "notes"}))
            .await,
        "Deleted directory: notes"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "read_file_content", json!({"file_path": "notes/today.txt"}))
            .await,
        "File not found: notes/today.txt"
    );
}

#[tokio::test]
async fn read_file_content_previews_large_multibyte_files() {
    let session = TestSession::new();
    let body = "é".repeat(200_000);
    std::fs::write(session.dir.path().join("big.txt"), &body).expect("write");
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "read_file_content",
                json!({"file_path": "big.txt", "max_chars": 4}),
            )
            .await,
        "Content of big.txt:\néééé\n... (truncated, file is larger than 4 chars)"
    );

    std::fs::write(session.dir.path().join("short.txt"), "héllo").expect("write");
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "read_file_content",
                json!({"file_path": "short.txt", "max_chars": 5}),
            )
            .await,
        "Content of short.txt:\nhéllo"
    );
}

#[tokio::test]
async fn control_volume_drives_pactl() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(&ctx, "control_volume", json!({"action": "set", "level": "40"}))
            .await,
        "Volume set to 40%"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "control_volume", json!({"action": "set", "level": 140}))
            .await,
        "Invalid volume level: 140. Use a value between 0 and 100"
    );
    assert_eq!(
        session.runner.runs(),
        vec!["pactl set-sink-volume @DEFAULT_SINK@ 40%"]
    );
}

#[tokio::test]
async fn control_volume_surfaces_helper_failures() {
    let session = TestSession::new();
    session
        .runner
        .script(ScriptedRun::failed(1, "Connection failure: Connection refused\n"));
    let output = builtin_tool_registry()
        .invoke(&session.context(), "control_volume", json!({"action": "mute"}))
        .await;
    assert_eq!(
        output,
        "Failed to control volume: Connection failure: Connection refused"
    );
}

#[tokio::test]
async fn network_control_pings_and_toggles_wifi() {
    let session = TestSession::new();
    session.runner.script(ScriptedRun::Completed(friday_rs_exec::CommandResult {
        status_code: Some(1),
        stdout: "4 packets transmitted, 0 received\n".to_string(),
        stderr: String::new(),
    }));
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "network_control",
                json!({"action": "ping", "interface": "example.com"}),
            )
            .await,
        "Ping results for example.com:\n4 packets transmitted, 0 received\n"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "network_control", json!({"action": "disable_wifi"}))
            .await,
        "Wi-Fi disabled"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "network_control", json!({"action": "ping"}))
            .await,
        "Invalid action or missing parameters"
    );
    assert_eq!(
        session.runner.runs(),
        vec!["ping -c 4 example.com", "nmcli radio wifi off"]
    );
}

#[tokio::test]
async fn power_management_schedules_delayed_shutdown() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(&ctx, "power_management", json!({"action": "shutdown", "delay": 30}))
            .await,
        "System will shutdown in 30 seconds"
    );
    assert_eq!(
        session.runner.spawns(),
        vec!["sh -c sleep 30 && systemctl poweroff"]
    );
    assert_eq!(
        registry
            .invoke(&ctx, "power_management", json!({"action": "lock"}))
            .await,
        "Executing lock"
    );
    assert_eq!(session.runner.runs(), vec!["loginctl lock-session"]);
    assert_eq!(
        registry
            .invoke(&ctx, "power_management", json!({"action": "restart", "delay": -5}))
            .await,
        "Invalid delay: -5. Use a non-negative number of seconds"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "power_management", json!({"action": "logout"}))
            .await,
        "Invalid action. Use: shutdown, restart, sleep, hibernate, lock"
    );
}

#[tokio::test]
async fn startup_programs_add_list_remove() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();

    assert_eq!(
        registry
            .invoke(&ctx, "manage_startup_programs", json!({"action": "list"}))
            .await,
        "No startup programs found"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "manage_startup_programs",
                json!({"action": "add", "program_name": "Syncer", "program_path": "/usr/bin/syncer"}),
            )
            .await,
        "Added Syncer to startup programs"
    );
    assert!(session.dir.path().join("autostart/Syncer.desktop").is_file());
    assert_eq!(
        registry
            .invoke(&ctx, "manage_startup_programs", json!({"action": "list"}))
            .await,
        "Startup programs:\nSyncer: /usr/bin/syncer\n"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "manage_startup_programs",
                json!({"action": "remove", "program_name": "syncer"}),
            )
            .await,
        "Removed syncer from startup programs"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "manage_startup_programs",
                json!({"action": "add", "program_name": "Syncer"}),
            )
            .await,
        "program_path is required for this action"
    );
}

#[tokio::test]
async fn open_application_falls_back_through_candidates() {
    let runner = RecordingRunner::new().with_programs(["gnome-calculator"]);
    let session = TestSession::with_doubles(runner, RecordingDesktop::new());
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(&ctx, "open_application", json!({"app_name": "Calculator"}))
            .await,
        "Opened Calculator using gnome-calculator"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "open_application", json!({"app_name": "photoshop"}))
            .await,
        "Could not open application: photoshop. Try providing the full path."
    );
    assert_eq!(session.runner.spawns(), vec!["gnome-calculator"]);
}
