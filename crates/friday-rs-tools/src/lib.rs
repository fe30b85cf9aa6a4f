//! Capability registry and built-in OS automation tools for Friday.

pub mod adaptor;
pub mod builtins;
pub mod context;
pub mod desktop;
pub mod mail;
pub mod output_policy;
pub mod process;
pub mod registry;
pub mod tool;
pub mod web;

/// Tool adaptor helpers.
pub use adaptor::{ToolAdaptor, tool_to_adaptor, tools_to_adaptors};
/// Built-in tool registry and registration helpers.
pub use builtins::{
    builtin_tool_registry, builtin_tool_registry_with_deny, builtin_tools, register_builtin_tools,
};
/// Tool context, session services, and the boundary adapter.
pub use context::{ToolContext, ToolLimits, ToolServices, render_error};
/// Desktop automation backend.
pub use desktop::{
    DesktopBackend, MouseButton, Point, Region, ScreenSize, ScrollDirection, WindowInfo,
    XdoDesktop,
};
/// Mail transport.
pub use mail::{EmailMessage, Mailer, SmtpMailer};
/// Tool output policy.
pub use output_policy::ToolOutputPolicy;
/// Tool registry type.
pub use registry::ToolRegistry;
/// Tool trait and spec type.
pub use tool::{Tool, ToolSpec};
/// Web provider types.
pub use web::{HttpWebProvider, WebProvider, WebSearchResult};
