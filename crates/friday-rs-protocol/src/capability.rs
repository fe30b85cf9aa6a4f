//! Closed catalog of assistant capabilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every capability the assistant can expose to a dialogue engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    GetWeather,
    SearchWeb,
    SendEmail,
    CaptureScreen,
    GetScreenInfo,
    FindOnScreen,
    ClickOnScreen,
    TypeText,
    PressKeyCombination,
    OpenApplication,
    CloseApplication,
    GetRunningProcesses,
    CreateFile,
    ReadFileContent,
    DeleteFile,
    ListDirectory,
    GetSystemInfo,
    ControlVolume,
    WindowManagement,
    ScrollPage,
    RunCommand,
    RememberInformation,
    RecallInformation,
    AddTaskToMemory,
    AdvancedWindowControl,
    MouseAutomation,
    KeyboardAutomation,
    ManageStartupPrograms,
    NetworkControl,
    PowerManagement,
}

/// Error returned when a name does not match any capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl Capability {
    /// All capabilities in catalog order.
    pub const ALL: [Capability; 30] = [
        Capability::GetWeather,
        Capability::SearchWeb,
        Capability::SendEmail,
        Capability::CaptureScreen,
        Capability::GetScreenInfo,
        Capability::FindOnScreen,
        Capability::ClickOnScreen,
        Capability::TypeText,
        Capability::PressKeyCombination,
        Capability::OpenApplication,
        Capability::CloseApplication,
        Capability::GetRunningProcesses,
        Capability::CreateFile,
        Capability::ReadFileContent,
        Capability::DeleteFile,
        Capability::ListDirectory,
        Capability::GetSystemInfo,
        Capability::ControlVolume,
        Capability::WindowManagement,
        Capability::ScrollPage,
        Capability::RunCommand,
        Capability::RememberInformation,
        Capability::RecallInformation,
        Capability::AddTaskToMemory,
        Capability::AdvancedWindowControl,
        Capability::MouseAutomation,
        Capability::KeyboardAutomation,
        Capability::ManageStartupPrograms,
        Capability::NetworkControl,
        Capability::PowerManagement,
    ];

    /// Stable wire name used by the dialogue engine.
    pub fn name(self) -> &'static str {
        match self {
            Capability::GetWeather => "get_weather",
            Capability::SearchWeb => "search_web",
            Capability::SendEmail => "send_email",
            Capability::CaptureScreen => "capture_screen",
            Capability::GetScreenInfo => "get_screen_info",
            Capability::FindOnScreen => "find_on_screen",
            Capability::ClickOnScreen => "click_on_screen",
            Capability::TypeText => "type_text",
            Capability::PressKeyCombination => "press_key_combination",
            Capability::OpenApplication => "open_application",
            Capability::CloseApplication => "close_application",
            Capability::GetRunningProcesses => "get_running_processes",
            Capability::CreateFile => "create_file",
            Capability::ReadFileContent => "read_file_content",
            Capability::DeleteFile => "delete_file",
            Capability::ListDirectory => "list_directory",
            Capability::GetSystemInfo => "get_system_info",
            Capability::ControlVolume => "control_volume",
            Capability::WindowManagement => "window_management",
            Capability::ScrollPage => "scroll_page",
            Capability::RunCommand => "run_command",
            Capability::RememberInformation => "remember_information",
            Capability::RecallInformation => "recall_information",
            Capability::AddTaskToMemory => "add_task_to_memory",
            Capability::AdvancedWindowControl => "advanced_window_control",
            Capability::MouseAutomation => "mouse_automation",
            Capability::KeyboardAutomation => "keyboard_automation",
            Capability::ManageStartupPrograms => "manage_startup_programs",
            Capability::NetworkControl => "network_control",
            Capability::PowerManagement => "power_management",
        }
    }

    /// Natural-language description presented to the dialogue engine.
    pub fn description(self) -> &'static str {
        match self {
            Capability::GetWeather => "Get the current weather for a given city.",
            Capability::SearchWeb => "Search the web using DuckDuckGo.",
            Capability::SendEmail => "Send an email through the configured SMTP relay.",
            Capability::CaptureScreen => "Capture a screenshot of the current screen.",
            Capability::GetScreenInfo => {
                "Get information about the current screen resolution and setup."
            }
            Capability::FindOnScreen => "Find an image on the screen using template matching.",
            Capability::ClickOnScreen => "Click at a specific position on the screen.",
            Capability::TypeText => "Type text at the current cursor position.",
            Capability::PressKeyCombination => "Press a key combination (keyboard shortcut).",
            Capability::OpenApplication => "Open an application by name or path.",
            Capability::CloseApplication => "Close an application by process name.",
            Capability::GetRunningProcesses => "Get a list of currently running processes.",
            Capability::CreateFile => "Create a new file with optional content.",
            Capability::ReadFileContent => "Read content from a file.",
            Capability::DeleteFile => "Delete a file or directory.",
            Capability::ListDirectory => "List contents of a directory.",
            Capability::GetSystemInfo => {
                "Get system information including CPU, memory, disk usage."
            }
            Capability::ControlVolume => "Control system volume.",
            Capability::WindowManagement => {
                "Manage windows (minimize all, show desktop, switch, minimize or maximize current)."
            }
            Capability::ScrollPage => "Scroll the current page or window.",
            Capability::RunCommand => "Run a system command and return the output.",
            Capability::RememberInformation => {
                "Remember user preferences and information for future reference."
            }
            Capability::RecallInformation => "Recall previously stored information.",
            Capability::AddTaskToMemory => "Add a task to memory for tracking.",
            Capability::AdvancedWindowControl => {
                "Advanced window control including moving and resizing specific windows."
            }
            Capability::MouseAutomation => "Advanced mouse automation including drag operations.",
            Capability::KeyboardAutomation => {
                "Advanced keyboard automation with modifier keys."
            }
            Capability::ManageStartupPrograms => "Manage programs started at login.",
            Capability::NetworkControl => {
                "Control network interfaces and get network information."
            }
            Capability::PowerManagement => "System power management operations.",
        }
    }

    /// Prefix used when a handler fails during execution.
    pub fn failure_message(self) -> &'static str {
        match self {
            Capability::GetWeather => "Could not retrieve weather",
            Capability::SearchWeb => "An error occurred while searching the web",
            Capability::SendEmail => "Email sending failed",
            Capability::CaptureScreen => "Failed to capture screenshot",
            Capability::GetScreenInfo => "Failed to get screen information",
            Capability::FindOnScreen => "Failed to find image on screen",
            Capability::ClickOnScreen => "Failed to click on screen",
            Capability::TypeText => "Failed to type text",
            Capability::PressKeyCombination => "Failed to press key combination",
            Capability::OpenApplication => "Failed to open application",
            Capability::CloseApplication => "Failed to close application",
            Capability::GetRunningProcesses => "Failed to get running processes",
            Capability::CreateFile => "Failed to create file",
            Capability::ReadFileContent => "Failed to read file",
            Capability::DeleteFile => "Failed to delete file",
            Capability::ListDirectory => "Failed to list directory",
            Capability::GetSystemInfo => "Failed to get system information",
            Capability::ControlVolume => "Failed to control volume",
            Capability::WindowManagement => "Failed to manage windows",
            Capability::ScrollPage => "Failed to scroll",
            Capability::RunCommand => "Failed to run command",
            Capability::RememberInformation => "Failed to remember information",
            Capability::RecallInformation => "Failed to recall information",
            Capability::AddTaskToMemory => "Failed to add task",
            Capability::AdvancedWindowControl => "Failed to control window",
            Capability::MouseAutomation => "Failed mouse automation",
            Capability::KeyboardAutomation => "Failed keyboard automation",
            Capability::ManageStartupPrograms => "Failed to manage startup programs",
            Capability::NetworkControl => "Failed network control",
            Capability::PowerManagement => "Failed power management",
        }
    }

    /// Whether the capability reads or writes the persistent memory document.
    pub fn touches_memory(self) -> bool {
        matches!(
            self,
            Capability::RememberInformation
                | Capability::RecallInformation
                | Capability::AddTaskToMemory
        )
    }

    /// Look up a capability by its wire name.
    pub fn from_name(name: &str) -> Option<Capability> {
        Capability::ALL
            .into_iter()
            .find(|capability| capability.name() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::from_name(s).ok_or_else(|| UnknownCapability(s.to_string()))
    }
}
