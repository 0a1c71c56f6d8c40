pub mod declarations;
pub mod dispatcher;
pub mod math;
pub mod registry;
pub mod traits;
pub mod transcript;

pub use declarations::tool_declarations;
pub use dispatcher::ToolDispatcher;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use traits::{parse_args, ToolDeclaration, ToolHandler};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Known tools
// ---------------------------------------------------------------------------

/// Every tool this crate can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetYoutubeTranscript,
    EvaluateMathExpression,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [Self::GetYoutubeTranscript, Self::EvaluateMathExpression];

    /// Wire name used in declarations and tool calls.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetYoutubeTranscript => "get_youtube_transcript",
            Self::EvaluateMathExpression => "evaluate_math_expression",
        }
    }

    /// Phrase shown in call summaries.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::GetYoutubeTranscript => "Get Youtube Transcript",
            Self::EvaluateMathExpression => "Evaluate Math Expression",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the wire name.
impl FromStr for ToolName {
    type Err = UnknownToolName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownToolName(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownToolName(pub String);
