//! Shared types exchanged with the model-interaction layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Tool calls
// ---------------------------------------------------------------------------

/// A tool call request from the model.
///
/// A missing `name` deserializes to the empty string and a missing `args`
/// to an empty object, so malformed calls still reach the dispatcher and
/// the summary formatter instead of failing at the decoding step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            id: None,
            name: name.into(),
            args,
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Payload of a function response: echoed inputs plus `content`.
///
/// `content` is always present. Failures are reported through its text,
/// never through a separate flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    #[serde(flatten)]
    pub inputs: Map<String, Value>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: ToolResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponsePart {
    pub function_response: FunctionResponse,
}

/// The normalized result of dispatching one [`ToolCall`].
///
/// Serializes as `[{"functionResponse": {"name": .., "response": {..}}}]`;
/// the one-element array keeps the "exactly one record" shape in the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolResponseEnvelope(pub [FunctionResponsePart; 1]);

impl ToolResponseEnvelope {
    /// Build an envelope. `name` is echoed into the response alongside any
    /// other salient inputs. Inputs called `name` or `content` are dropped;
    /// those keys always carry the tool name and the result.
    pub fn new<I, K>(name: &str, inputs: I, content: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut echoed = Map::new();
        echoed.insert("name".into(), Value::String(name.to_string()));
        for (key, value) in inputs {
            let key = key.into();
            if key == "name" || key == "content" {
                continue;
            }
            echoed.insert(key, value);
        }

        Self([FunctionResponsePart {
            function_response: FunctionResponse {
                name: name.to_string(),
                response: ToolResponse {
                    inputs: echoed,
                    content: content.into(),
                },
            },
        }])
    }

    /// Envelope returned when no handler is registered for `name`.
    pub fn not_found(name: &str) -> Self {
        Self::new(
            name,
            std::iter::empty::<(String, Value)>(),
            format!("No function found for {}", name),
        )
    }

    pub fn name(&self) -> &str {
        &self.0[0].function_response.name
    }

    pub fn response(&self) -> &ToolResponse {
        &self.0[0].function_response.response
    }

    pub fn content(&self) -> &str {
        &self.response().content
    }
}
