//! Static tool declarations exposed to the inference model.

use crate::tools::{ToolDeclaration, ToolName};
use serde_json::json;

/// Build the list of tool declarations, in [`ToolName::ALL`] order.
pub fn tool_declarations() -> Vec<ToolDeclaration> {
    ToolName::ALL.iter().map(|t| t.declaration()).collect()
}

impl ToolName {
    /// Declaration advertised to the model for this tool.
    pub fn declaration(self) -> ToolDeclaration {
        match self {
            Self::GetYoutubeTranscript => ToolDeclaration {
                name: self.as_str().into(),
                description: "Fetch the transcript of a YouTube video.".into(),
                parameters: json!({
                    "type": "object",
                    "description": "Fetches the spoken transcript of a YouTube video as plain text.",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "Full URL of the YouTube video"
                        }
                    },
                    "required": ["url"]
                }),
            },
            Self::EvaluateMathExpression => ToolDeclaration {
                name: self.as_str().into(),
                description: "Evaluate a mathematical expression.".into(),
                parameters: json!({
                    "type": "object",
                    "description": "Evaluates a numeric expression such as '2 * (3 + 4) ^ 2' or 'sqrt(2) / 2'.",
                    "properties": {
                        "equation": {
                            "type": "string",
                            "description": "The expression to evaluate"
                        }
                    },
                    "required": ["equation"]
                }),
            },
        }
    }
}
