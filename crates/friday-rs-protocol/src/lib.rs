//! Wire protocol types for Friday: the capability catalog, tool errors, and
//! the JSON lines messages exchanged with an external dialogue engine.

mod capability;
mod tool;

pub use capability::{Capability, UnknownCapability};
pub use tool::ToolError;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Requests accepted by the stdio tool host, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum HostRequest {
    /// Invoke a capability by name.
    Invoke {
        /// Optional caller-chosen id echoed in the response.
        #[serde(default)]
        id: Option<String>,
        /// Capability name.
        name: String,
        /// Structured arguments for the capability.
        #[serde(default = "empty_json_object")]
        arguments: Value,
    },
    /// Record a completed conversation turn in memory.
    RecordTurn {
        /// What the user said.
        user: String,
        /// What the assistant answered.
        assistant: String,
    },
    /// List the registered capabilities and their schemas.
    ListTools,
}

/// Responses written by the stdio tool host, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum HostResponse {
    /// Textual outcome of a capability invocation.
    Result {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        output: String,
    },
    /// Turn was recorded.
    Recorded,
    /// Registered capabilities.
    Tools { tools: Vec<ToolDescriptor> },
    /// The request line could not be understood.
    Error { message: String },
}

/// Name, description, and argument schema for a registered capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Capability name.
    pub name: String,
    /// Capability description.
    pub description: String,
    /// JSON schema for capability arguments.
    pub parameters: Value,
}

/// Build an empty JSON object value.
fn empty_json_object() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::{HostRequest, HostResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn invoke_defaults_arguments_to_empty_object() {
        let request: HostRequest =
            serde_json::from_str(r#"{"type":"invoke","name":"get_screen_info"}"#).expect("parse");
        assert_eq!(
            request,
            HostRequest::Invoke {
                id: None,
                name: "get_screen_info".to_string(),
                arguments: json!({}),
            }
        );
    }

    #[test]
    fn record_turn_parses() {
        let request: HostRequest = serde_json::from_value(json!({
            "type": "record_turn",
            "user": "hello",
            "assistant": "Good evening, sir.",
        }))
        .expect("parse");
        assert_eq!(
            request,
            HostRequest::RecordTurn {
                user: "hello".to_string(),
                assistant: "Good evening, sir.".to_string(),
            }
        );
    }

    #[test]
    fn result_without_id_omits_field() {
        let response = HostResponse::Result {
            id: None,
            output: "done".to_string(),
        };
        let value = serde_json::to_value(response).expect("serialize");
        assert_eq!(value, json!({ "type": "result", "output": "done" }));
    }
}
