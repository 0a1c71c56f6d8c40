//! Resolve model tool calls against the registry and run them.

use crate::error::DispatchError;
use crate::retry::RetryPolicy;
use crate::tools::ToolRegistry;
use crate::types::{ToolCall, ToolResponseEnvelope};
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

/// Tool-call dispatcher over a shared, read-only [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one call.
    ///
    /// Unknown names yield a "No function found" envelope without invoking
    /// anything. A resolved handler's envelope is returned as-is; a handler
    /// error is not caught and comes back as [`DispatchError::Handler`].
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolResponseEnvelope, DispatchError> {
        let span = info_span!("dispatch", tool = %call.name, call_id = %call_id(call));
        async {
            let Some(handler) = self.registry.resolve(&call.name) else {
                warn!("No function found for {}", call.name);
                return Ok(ToolResponseEnvelope::not_found(&call.name));
            };

            debug!("Invoking handler");
            handler
                .call(&call.args, &call.name)
                .await
                .map_err(|source| DispatchError::Handler {
                    name: call.name.clone(),
                    source,
                })
        }
        .instrument(span)
        .await
    }

    /// Like [`dispatch`](Self::dispatch), but re-invokes a handler that
    /// propagates an error, following `policy`.
    ///
    /// Unknown names are answered immediately and never retried.
    pub async fn dispatch_with_retry(
        &self,
        call: &ToolCall,
        policy: &RetryPolicy,
    ) -> Result<ToolResponseEnvelope, DispatchError> {
        let span = info_span!("dispatch", tool = %call.name, call_id = %call_id(call));
        async {
            let Some(handler) = self.registry.resolve(&call.name) else {
                warn!("No function found for {}", call.name);
                return Ok(ToolResponseEnvelope::not_found(&call.name));
            };

            policy
                .run(|| handler.call(&call.args, &call.name))
                .await
                .map_err(|source| DispatchError::RetryExhausted {
                    name: call.name.clone(),
                    source,
                })
        }
        .instrument(span)
        .await
    }

    /// Dispatch calls one after another, in order.
    ///
    /// Stops at the first call whose handler propagates an error.
    pub async fn dispatch_all(
        &self,
        calls: &[ToolCall],
    ) -> Result<Vec<ToolResponseEnvelope>, DispatchError> {
        let mut envelopes = Vec::with_capacity(calls.len());
        for call in calls {
            envelopes.push(self.dispatch(call).await?);
        }
        Ok(envelopes)
    }
}

fn call_id(call: &ToolCall) -> String {
    call.id
        .clone()
        .unwrap_or_else(|| ulid::Ulid::new().to_string())
}
