//! One-line, human-readable descriptions of a batch of tool calls.

use crate::tools::ToolName;
use crate::types::ToolCall;
use serde_json::Value;

/// Rendered argument values longer than this many characters are cut.
pub const MAX_ARG_CHARS: usize = 500;

const ELLIPSIS: &str = "...";

/// Describe `calls` as e.g. `"Get Youtube Transcript (url: http://x)"`,
/// joining calls with `", "`. Calls without a name are skipped.
pub fn summarize(calls: &[ToolCall]) -> String {
    calls
        .iter()
        .map(summarize_call)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn summarize_call(call: &ToolCall) -> String {
    if call.name.is_empty() {
        return String::new();
    }

    let name = display_name(&call.name);
    if call.args.is_empty() {
        return name;
    }

    let args = call
        .args
        .iter()
        .map(|(key, value)| format!("{}: {}", key, truncate(&render_value(value))))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{} ({})", name, args)
}

/// Display phrase for a tool name. Known tools come from the table on
/// [`ToolName`]; anything else is title-cased token by token.
pub fn display_name(name: &str) -> String {
    match name.parse::<ToolName>() {
        Ok(tool) => tool.display_name().to_string(),
        Err(_) => title_case(name),
    }
}

/// `get_youtube_transcript` → `Get Youtube Transcript`. Tokens split on
/// `_`, `-` and whitespace; numeric tokens are kept as they are.
pub fn title_case(identifier: &str) -> String {
    identifier
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    if is_number(token) {
        return token.to_string();
    }
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_number(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit() || c == '.') && token.parse::<f64>().is_ok()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_ARG_CHARS) {
        Some((cut, _)) => format!("{}{}", &s[..cut], ELLIPSIS),
        None => s.to_string(),
    }
}
