//! Screen, input, and window capability tests over a recording desktop.

use friday_rs_test_utils::{RecordingDesktop, RecordingRunner, TestSession};
use friday_rs_tools::{Region, builtin_tool_registry};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn click_outside_screen_is_rejected_without_input() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(&session.context(), "click_on_screen", json!({"x": 5000, "y": 10}))
        .await;
    assert_eq!(
        output,
        "Invalid coordinates: (5000, 10). Screen size is 1920x1080"
    );
    assert!(session.desktop.actions().is_empty());
}

#[tokio::test]
async fn click_accepts_stringified_coordinates() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(
            &session.context(),
            "click_on_screen",
            json!({"x": "100", "y": "200", "clicks": "2"}),
        )
        .await;
    assert_eq!(output, "Clicked at (100, 200) with left button (2 clicks)");
    assert_eq!(session.desktop.actions(), vec!["click 100,200 left x2"]);
}

#[tokio::test]
async fn mouse_automation_requires_coordinates() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(&ctx, "mouse_automation", json!({"action": "move"}))
            .await,
        "Coordinates (x, y) are required for this action"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "mouse_automation", json!({"action": "scroll_up"}))
            .await,
        "Scrolled up"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "mouse_automation",
                json!({"action": "drag", "x": 300, "y": 400, "duration": "0.25"}),
            )
            .await,
        "Dragged from (0, 0) to (300, 400)"
    );
    assert_eq!(
        session.desktop.actions(),
        vec!["scroll up 3", "drag 300,400 left 250ms"]
    );
}

#[tokio::test]
async fn keyboard_automation_covers_hotkeys_and_holds() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "keyboard_automation",
                json!({"action": "hotkey", "key": "c", "modifier": "ctrl"}),
            )
            .await,
        "Pressed hotkey: ctrl+c"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "keyboard_automation", json!({"action": "hold", "key": "shift"}))
            .await,
        "Holding key: shift"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "keyboard_automation", json!({"action": "hotkey", "key": "c"}))
            .await,
        "Invalid action or missing parameters"
    );
    assert_eq!(session.desktop.actions(), vec!["keys ctrl+c", "keydown shift"]);
}

#[tokio::test]
async fn press_key_combination_splits_on_plus() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(
            &session.context(),
            "press_key_combination",
            json!({"keys": "ctrl+shift+t"}),
        )
        .await;
    assert_eq!(output, "Pressed key combination: ctrl+shift+t");
    assert_eq!(session.desktop.actions(), vec!["keys ctrl+shift+t"]);
}

#[tokio::test]
async fn scroll_page_validates_direction() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(&ctx, "scroll_page", json!({"direction": "down", "amount": 5}))
            .await,
        "Scrolled down 5 times"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "scroll_page", json!({"direction": "sideways"}))
            .await,
        "Invalid direction. Use: up, down, left, right"
    );
}

#[tokio::test]
async fn screen_info_reports_geometry() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(&session.context(), "get_screen_info", json!({}))
        .await;
    assert_eq!(
        output,
        "Screen Information:\n- Resolution: 1920 x 1080\n- Current mouse position: (0, 0)\n- Screen area: 2073600 pixels"
    );
}

#[tokio::test]
async fn capture_screen_saves_relative_paths_in_session_dir() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(
            &session.context(),
            "capture_screen",
            json!({"save_path": "shot.png", "region": "10,20,300,200"}),
        )
        .await;
    assert_eq!(output, "Screenshot captured and saved to shot.png");
    assert!(session.dir.path().join("shot.png").is_file());
    assert_eq!(
        session.desktop.actions(),
        vec!["capture left=10, top=20, width=300, height=200"]
    );
}

#[tokio::test]
async fn capture_screen_rejects_malformed_regions() {
    let session = TestSession::new();
    let output = builtin_tool_registry()
        .invoke(&session.context(), "capture_screen", json!({"region": "10,20"}))
        .await;
    assert_eq!(
        output,
        "Invalid region format. Use 'x,y,width,height' (e.g., '100,100,800,600')"
    );
}

#[tokio::test]
async fn find_on_screen_reports_center_of_match() {
    let desktop = RecordingDesktop::new().with_located(Region {
        x: 100,
        y: 50,
        width: 40,
        height: 20,
    });
    let session = TestSession::with_doubles(RecordingRunner::new(), desktop);
    std::fs::write(session.dir.path().join("button.png"), b"png").expect("write template");
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(&ctx, "find_on_screen", json!({"image_path": "button.png"}))
            .await,
        "Image found at position: 120, 60 (region: left=100, top=50, width=40, height=20)"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "find_on_screen", json!({"image_path": "missing.png"}))
            .await,
        "Template image not found: missing.png"
    );
}

#[tokio::test]
async fn window_management_presses_chords() {
    let session = TestSession::new();
    let registry = builtin_tool_registry();
    let ctx = session.context();
    assert_eq!(
        registry
            .invoke(&ctx, "window_management", json!({"action": "alt_tab"}))
            .await,
        "Switched between windows"
    );
    assert_eq!(session.desktop.actions(), vec!["keys alt+tab"]);
}

#[tokio::test]
async fn advanced_window_control_matches_partial_titles() {
    let desktop = RecordingDesktop::new().with_windows(["Terminal", "Mozilla Firefox"]);
    let session = TestSession::with_doubles(RecordingRunner::new(), desktop);
    let registry = builtin_tool_registry();
    let ctx = session.context();

    assert_eq!(
        registry
            .invoke(&ctx, "advanced_window_control", json!({"action": "list_windows"}))
            .await,
        "Open windows:\n- Terminal\n- Mozilla Firefox\n"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "advanced_window_control",
                json!({"action": "move", "window_title": "firefox", "x": 10, "y": 20}),
            )
            .await,
        "Moved window to (10, 20)"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "advanced_window_control",
                json!({"action": "focus", "window_title": "slack"}),
            )
            .await,
        "Window with title containing 'slack' not found"
    );
    assert_eq!(
        registry
            .invoke(&ctx, "advanced_window_control", json!({"action": "close"}))
            .await,
        "Window title is required for this action"
    );
    assert_eq!(
        registry
            .invoke(
                &ctx,
                "advanced_window_control",
                json!({"action": "resize", "window_title": "term"}),
            )
            .await,
        "Invalid action or missing parameters"
    );
    assert_eq!(
        session.desktop.actions(),
        vec!["move-window Mozilla Firefox 10,20"]
    );
}
