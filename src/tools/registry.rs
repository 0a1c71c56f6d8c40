//! Name → handler table, validated against the declarations at build time.

use crate::config::RelayConfig;
use crate::error::RegistryError;
use crate::tools::math::MathHandler;
use crate::tools::transcript::{HttpTranscriptSource, TranscriptHandler};
use crate::tools::{tool_declarations, ToolDeclaration, ToolHandler, ToolName};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Immutable registry of tool handlers.
pub struct ToolRegistry {
    handlers: HashMap<ToolName, Arc<dyn ToolHandler>>,
    declarations: Vec<ToolDeclaration>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tools: Vec<&str> = self.handlers.keys().map(|t| t.as_str()).collect();
        tools.sort_unstable();
        f.debug_struct("ToolRegistry").field("tools", &tools).finish()
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Build the production registry with every shipped handler.
    pub fn standard(config: &RelayConfig) -> Result<Self> {
        let source = HttpTranscriptSource::new(
            &config.transcript_api_url,
            &config.transcript_api_key,
            config.request_timeout(),
        )?;

        let registry = Self::builder()
            .register(TranscriptHandler::new(source, config.retry))
            .register(MathHandler)
            .build(&tool_declarations())?;
        Ok(registry)
    }

    /// Look up the handler for a tool name. Exact match only.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        let tool: ToolName = name.parse().ok()?;
        self.handlers.get(&tool)
    }

    /// Declarations this registry was validated against.
    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Collects handlers before the consistency check in [`build`](Self::build).
#[derive(Default)]
pub struct ToolRegistryBuilder {
    handlers: HashMap<ToolName, Arc<dyn ToolHandler>>,
    duplicates: Vec<ToolName>,
}

impl ToolRegistryBuilder {
    pub fn register(self, handler: impl ToolHandler + 'static) -> Self {
        self.register_shared(Arc::new(handler))
    }

    pub fn register_shared(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        let tool = handler.tool();
        if self.handlers.insert(tool, handler).is_some() {
            self.duplicates.push(tool);
        }
        self
    }

    /// Check the collected handlers against `declared` and freeze them.
    ///
    /// Every declared name must be a known tool with exactly one handler,
    /// and every handler must serve a declared tool.
    pub fn build(self, declared: &[ToolDeclaration]) -> Result<ToolRegistry, RegistryError> {
        if let Some(tool) = self.duplicates.first() {
            return Err(RegistryError::DuplicateHandler(*tool));
        }

        let mut declared_tools = HashSet::new();
        for decl in declared {
            let tool: ToolName = decl
                .name
                .parse()
                .map_err(|_| RegistryError::UnknownTool(decl.name.clone()))?;
            if !self.handlers.contains_key(&tool) {
                return Err(RegistryError::MissingHandler(tool));
            }
            declared_tools.insert(tool);
        }

        // Iterate in a fixed order so the reported tool is deterministic.
        for tool in ToolName::ALL {
            if self.handlers.contains_key(&tool) && !declared_tools.contains(&tool) {
                return Err(RegistryError::UndeclaredHandler(tool));
            }
        }

        Ok(ToolRegistry {
            handlers: self.handlers,
            declarations: declared.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolResponseEnvelope;
    use async_trait::async_trait;
    use serde_json::{Map, Value};

    struct Stub(ToolName);

    #[async_trait]
    impl ToolHandler for Stub {
        fn tool(&self) -> ToolName {
            self.0
        }

        async fn call(&self, _args: &Map<String, Value>, name: &str) -> Result<ToolResponseEnvelope> {
            Ok(ToolResponseEnvelope::new(name, std::iter::empty::<(String, Value)>(), "stub"))
        }
    }

    fn full_builder() -> ToolRegistryBuilder {
        ToolRegistry::builder()
            .register(Stub(ToolName::GetYoutubeTranscript))
            .register(Stub(ToolName::EvaluateMathExpression))
    }

    #[test]
    fn builds_when_declarations_and_handlers_match() {
        let registry = full_builder().build(&tool_declarations()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.declarations().len(), 2);
        assert!(registry.resolve("get_youtube_transcript").is_some());
        assert!(registry.resolve("evaluate_math_expression").is_some());
    }

    #[test]
    fn resolve_is_exact_match() {
        let registry = full_builder().build(&tool_declarations()).unwrap();
        assert!(registry.resolve("GET_YOUTUBE_TRANSCRIPT").is_none());
        assert!(registry.resolve("get_youtube_transcript ").is_none());
        assert!(registry.resolve("youtube").is_none());
    }

    #[test]
    fn missing_handler_is_rejected() {
        let err = ToolRegistry::builder()
            .register(Stub(ToolName::GetYoutubeTranscript))
            .build(&tool_declarations())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingHandler(ToolName::EvaluateMathExpression)
        ));
    }

    #[test]
    fn undeclared_handler_is_rejected() {
        let declared = vec![ToolName::GetYoutubeTranscript.declaration()];
        let err = full_builder().build(&declared).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UndeclaredHandler(ToolName::EvaluateMathExpression)
        ));
    }

    #[test]
    fn duplicate_handler_is_rejected() {
        let err = full_builder()
            .register(Stub(ToolName::GetYoutubeTranscript))
            .build(&tool_declarations())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateHandler(ToolName::GetYoutubeTranscript)
        ));
    }

    #[test]
    fn unknown_declaration_is_rejected() {
        let mut declared = tool_declarations();
        declared.push(ToolDeclaration {
            name: "send_email".into(),
            description: String::new(),
            parameters: Value::Null,
        });
        let err = full_builder().build(&declared).unwrap_err();
        assert_eq!(err.to_string(), "declared tool 'send_email' is not a known tool");
    }

    #[test]
    fn standard_registry_covers_every_declaration() {
        let registry = ToolRegistry::standard(&RelayConfig::default()).unwrap();
        for decl in tool_declarations() {
            assert!(registry.resolve(&decl.name).is_some(), "{}", decl.name);
        }
    }
}
