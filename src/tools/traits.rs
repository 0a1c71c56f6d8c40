//! Tool handler trait and declaration types.

use crate::tools::ToolName;
use crate::types::ToolResponseEnvelope;
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declaration of a tool advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Implementation of one tool.
///
/// Handlers own their failure reporting: anything that goes wrong while
/// serving a call should come back as an envelope whose `content` describes
/// the problem. Returning `Err` is reserved for failures the handler could
/// not classify, and propagates out of the dispatcher.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The tool this handler serves.
    fn tool(&self) -> ToolName;

    /// Serve one call. `name` is the name the model used.
    async fn call(&self, args: &Map<String, Value>, name: &str) -> Result<ToolResponseEnvelope>;
}

/// Deserialize raw call arguments into a handler's typed argument struct.
pub fn parse_args<T: DeserializeOwned>(args: &Map<String, Value>) -> serde_json::Result<T> {
    serde_json::from_value(Value::Object(args.clone()))
}
