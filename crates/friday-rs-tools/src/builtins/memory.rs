//! Built-in tools backed by the persistent memory store.

use crate::builtins::utils::{parse_args, schema_of};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct RememberArgs {
    #[input(description = "The key to store the information under")]
    key: String,
    #[input(description = "The value to remember")]
    value: String,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct RecallArgs {
    #[input(description = "The key to retrieve information for")]
    key: String,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct AddTaskArgs {
    #[input(description = "The task to remember")]
    task: String,
}

/// Tool that stores a user preference.
#[derive(Debug, Default)]
pub struct RememberInformationTool;

#[async_trait]
impl Tool for RememberInformationTool {
    fn capability(&self) -> Capability {
        Capability::RememberInformation
    }

    fn args_schema(&self) -> Value {
        schema_of(RememberArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: RememberArgs = parse_args(args)?;
        ctx.services
            .memory
            .set_preference(input.key.clone(), input.value.clone());
        info!("stored preference (key_len={})", input.key.len());
        Ok(format!("I'll remember that {}: {}", input.key, input.value))
    }
}

/// Tool that reads a stored preference.
#[derive(Debug, Default)]
pub struct RecallInformationTool;

#[async_trait]
impl Tool for RecallInformationTool {
    fn capability(&self) -> Capability {
        Capability::RecallInformation
    }

    fn args_schema(&self) -> Value {
        schema_of(RecallArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: RecallArgs = parse_args(args)?;
        match ctx.services.memory.get_preference(&input.key) {
            Some(value) if !value.is_empty() => {
                Ok(format!("I remember that {}: {}", input.key, value))
            }
            _ => Ok(format!(
                "I don't have any information stored for {}",
                input.key
            )),
        }
    }
}

/// Tool that appends a task to memory.
#[derive(Debug, Default)]
pub struct AddTaskToMemoryTool;

#[async_trait]
impl Tool for AddTaskToMemoryTool {
    fn capability(&self) -> Capability {
        Capability::AddTaskToMemory
    }

    fn args_schema(&self) -> Value {
        schema_of(AddTaskArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: AddTaskArgs = parse_args(args)?;
        ctx.services.memory.add_task(input.task.clone());
        Ok(format!("Task added to memory: {}", input.task))
    }
}
