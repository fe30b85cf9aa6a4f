//! Built-in capabilities bundled with Friday.

mod apps;
mod command;
mod filesystem;
mod input;
mod memory;
mod network;
mod power;
mod screen;
mod startup;
mod system;
mod utils;
mod web;
mod window;

use crate::{Tool, ToolRegistry};
use friday_rs_protocol::Capability;
use log::{info, warn};
use std::sync::Arc;

pub use apps::{CloseApplicationTool, GetRunningProcessesTool, OpenApplicationTool};
pub use command::RunCommandTool;
pub use filesystem::{CreateFileTool, DeleteFileTool, ListDirectoryTool, ReadFileContentTool};
pub use input::{
    ClickOnScreenTool, KeyboardAutomationTool, MouseAutomationTool, PressKeyCombinationTool,
    ScrollPageTool, TypeTextTool,
};
pub use memory::{AddTaskToMemoryTool, RecallInformationTool, RememberInformationTool};
pub use network::NetworkControlTool;
pub use power::PowerManagementTool;
pub use screen::{CaptureScreenTool, FindOnScreenTool, GetScreenInfoTool};
pub use startup::ManageStartupProgramsTool;
pub use system::{ControlVolumeTool, GetSystemInfoTool};
pub use web::{GetWeatherTool, SearchWebTool, SendEmailTool};
pub use window::{AdvancedWindowControlTool, WindowManagementTool};

/// Every built-in handler, in catalog order.
pub fn builtin_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(GetWeatherTool),
        Arc::new(SearchWebTool),
        Arc::new(SendEmailTool),
        Arc::new(CaptureScreenTool),
        Arc::new(GetScreenInfoTool),
        Arc::new(FindOnScreenTool),
        Arc::new(ClickOnScreenTool),
        Arc::new(TypeTextTool),
        Arc::new(PressKeyCombinationTool),
        Arc::new(OpenApplicationTool),
        Arc::new(CloseApplicationTool),
        Arc::new(GetRunningProcessesTool),
        Arc::new(CreateFileTool),
        Arc::new(ReadFileContentTool),
        Arc::new(DeleteFileTool),
        Arc::new(ListDirectoryTool),
        Arc::new(GetSystemInfoTool),
        Arc::new(ControlVolumeTool),
        Arc::new(WindowManagementTool),
        Arc::new(ScrollPageTool),
        Arc::new(RunCommandTool),
        Arc::new(RememberInformationTool),
        Arc::new(RecallInformationTool),
        Arc::new(AddTaskToMemoryTool),
        Arc::new(AdvancedWindowControlTool),
        Arc::new(MouseAutomationTool),
        Arc::new(KeyboardAutomationTool),
        Arc::new(ManageStartupProgramsTool),
        Arc::new(NetworkControlTool),
        Arc::new(PowerManagementTool),
    ]
}

/// Register all built-in tools with the provided registry.
pub fn register_builtin_tools(registry: &ToolRegistry) {
    for tool in builtin_tools() {
        registry.register(tool);
    }
    info!("registered built-in tools (count={})", registry.len());
}

/// Build a registry pre-populated with built-in tools.
pub fn builtin_tool_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    register_builtin_tools(&registry);
    registry
}

/// Build a registry without the capabilities named in `deny`.
///
/// Unknown names are logged and ignored.
pub fn builtin_tool_registry_with_deny(deny: &[String]) -> ToolRegistry {
    let registry = builtin_tool_registry();
    for name in deny {
        match Capability::from_name(name.trim()) {
            Some(capability) => {
                registry.unregister(capability);
                info!("capability disabled by config (name={capability})");
            }
            None => warn!("ignoring unknown capability in deny list (name={name})"),
        }
    }
    registry
}
