//! Bridge from Friday capabilities to the AutoAgents `ToolT` trait.

use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::{ToolCallError, ToolRuntime, ToolT};
use friday_rs_protocol::Capability;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One capability bound to a session context, callable by an AutoAgents agent.
///
/// The runtime never returns `Err`: every outcome has already been rendered
/// to text by [`ToolContext::execute_tool`], and is handed back as a JSON string.
#[derive(Clone)]
pub struct ToolAdaptor {
    tool: Arc<dyn Tool>,
    ctx: ToolContext,
}

impl ToolAdaptor {
    /// Bind a tool to a session context.
    pub fn new(tool: Arc<dyn Tool>, ctx: ToolContext) -> Self {
        Self { tool, ctx }
    }

    /// Capability behind this adaptor.
    pub fn capability(&self) -> Capability {
        self.tool.capability()
    }
}

impl fmt::Debug for ToolAdaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolAdaptor")
            .field("capability", &self.tool.capability())
            .field("session_id", &self.ctx.session_id)
            .finish()
    }
}

#[async_trait]
impl ToolRuntime for ToolAdaptor {
    async fn execute(&self, args: Value) -> Result<Value, ToolCallError> {
        debug!("agent tool call (name={})", self.tool.name());
        let mut ctx = self.ctx.clone();
        Ok(Value::String(ctx.execute_tool(self.tool.as_ref(), args).await))
    }
}

impl ToolT for ToolAdaptor {
    fn name(&self) -> &str {
        self.tool.name()
    }

    fn description(&self) -> &str {
        self.tool.description()
    }

    fn args_schema(&self) -> Value {
        self.tool.args_schema()
    }
}

/// Wrap one tool for AutoAgents.
pub fn tool_to_adaptor(tool: Arc<dyn Tool>, ctx: &ToolContext) -> Arc<dyn ToolT> {
    Arc::new(ToolAdaptor::new(tool, ctx.clone()))
}

/// Wrap every tool for AutoAgents, sharing one session context.
pub fn tools_to_adaptors(tools: Vec<Arc<dyn Tool>>, ctx: &ToolContext) -> Vec<Arc<dyn ToolT>> {
    tools
        .into_iter()
        .map(|tool| tool_to_adaptor(tool, ctx))
        .collect()
}
