//! Tool trait definition and metadata spec.

use crate::context::ToolContext;
use async_trait::async_trait;
use friday_rs_protocol::{Capability, ToolDescriptor, ToolError};
use serde_json::Value;
use std::fmt::Debug;

/// Tool metadata spec for discovery and schema presentation.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Capability implemented by the tool.
    pub capability: Capability,
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON schema for tool arguments.
    pub args_schema: Value,
}

impl From<ToolSpec> for ToolDescriptor {
    fn from(spec: ToolSpec) -> Self {
        ToolDescriptor {
            name: spec.name,
            description: spec.description,
            parameters: spec.args_schema,
        }
    }
}

/// Interface for executable capabilities.
///
/// Handlers return `Err` for anything that went wrong; the boundary adapter in
/// [`ToolContext::execute_tool`] turns every outcome into a single string.
#[async_trait]
pub trait Tool: Send + Sync + Debug {
    /// Capability implemented by this tool.
    fn capability(&self) -> Capability;

    /// Return the tool name.
    fn name(&self) -> &str {
        self.capability().name()
    }

    /// Return the tool description.
    fn description(&self) -> &str {
        self.capability().description()
    }

    /// Return the JSON schema for tool arguments.
    fn args_schema(&self) -> Value;

    /// Invoke the tool with a context and arguments.
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError>;

    /// Build a `ToolSpec` describing this tool.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            capability: self.capability(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            args_schema: self.args_schema(),
        }
    }
}
