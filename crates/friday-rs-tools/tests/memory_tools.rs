//! Memory-backed capability integration tests.

use friday_rs_memory::MemoryStore;
use friday_rs_test_utils::TestSession;
use friday_rs_tools::builtin_tool_registry;
use pretty_assertions::assert_eq;
use serde_json::json;

/// Remembered preferences are written through and survive a reload.
#[tokio::test]
async fn remember_then_recall_persists_to_disk() {
    let session = TestSession::new();
    let ctx = session.context();
    let registry = builtin_tool_registry();

    let stored = registry
        .invoke(
            &ctx,
            "remember_information",
            json!({"key": "favorite color", "value": "teal"}),
        )
        .await;
    assert_eq!(stored, "I'll remember that favorite color: teal");

    let recalled = registry
        .invoke(&ctx, "recall_information", json!({"key": "favorite color"}))
        .await;
    assert_eq!(recalled, "I remember that favorite color: teal");

    let reopened = MemoryStore::open(session.memory.path());
    assert_eq!(
        reopened.get_preference("favorite color").as_deref(),
        Some("teal")
    );
}

#[tokio::test]
async fn recall_of_missing_key_is_not_an_error() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(&session.context(), "recall_information", json!({"key": "nickname"}))
        .await;
    assert_eq!(output, "I don't have any information stored for nickname");
}

#[tokio::test]
async fn add_task_appends_to_task_list() {
    let session = TestSession::new();
    let ctx = session.context();
    let registry = builtin_tool_registry();
    for task in ["buy milk", "call the dentist"] {
        let output = registry
            .invoke(&ctx, "add_task_to_memory", json!({"task": task}))
            .await;
        assert_eq!(output, format!("Task added to memory: {task}"));
    }
    let tasks = session
        .memory
        .tasks()
        .into_iter()
        .map(|task| task.task)
        .collect::<Vec<_>>();
    assert_eq!(tasks, vec!["buy milk", "call the dentist"]);
}

#[tokio::test]
async fn missing_arguments_are_reported_verbatim() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(&session.context(), "remember_information", json!({"key": "a"}))
        .await;
    assert_eq!(output, "missing field `value`");
}
