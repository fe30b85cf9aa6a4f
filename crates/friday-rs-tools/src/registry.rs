//! Registry for tool implementations.

use crate::context::ToolContext;
use crate::tool::{Tool, ToolSpec};
use friday_rs_protocol::{Capability, ToolError};
use log::{debug, warn};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory registry for tool implementations, keyed by capability.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    /// Map of capability to implementation, iterated in catalog order.
    tools: Arc<RwLock<BTreeMap<Capability, Arc<dyn Tool>>>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its capability, replacing any previous handler.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        debug!("registering tool (name={})", tool.name());
        self.tools.write().insert(tool.capability(), tool);
    }

    /// Remove a capability from the registry.
    pub fn unregister(&self, capability: Capability) -> Option<Arc<dyn Tool>> {
        debug!("unregistering tool (name={})", capability);
        self.tools.write().remove(&capability)
    }

    /// Fetch a tool by wire name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let capability = Capability::from_name(name)?;
        self.tools.read().get(&capability).cloned()
    }

    /// List all registered tool names.
    pub fn list(&self) -> Vec<String> {
        self.tools
            .read()
            .keys()
            .map(|capability| capability.name().to_string())
            .collect()
    }

    /// Return all registered tool instances.
    pub fn all(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.read().values().cloned().collect()
    }

    /// Return tool specs for all registered tools.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.read().values().map(|tool| tool.spec()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }

    /// Invoke a capability by name and return its single textual result.
    pub async fn invoke(&self, ctx: &ToolContext, name: &str, args: Value) -> String {
        let Some(tool) = self.get(name) else {
            warn!("unknown capability requested (name={})", name);
            return ToolError::ToolNotFound(name.to_string()).to_string();
        };
        let mut ctx = ctx.clone();
        ctx.execute_tool(tool.as_ref(), args).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list())
            .finish()
    }
}
