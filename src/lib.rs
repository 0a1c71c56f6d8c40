//! toolrelay — function-calling dispatch for LLM agents.
//!
//! Resolves model-issued tool calls against a validated registry of local
//! handlers, normalizes every outcome into a response envelope, and
//! provides a fixed-backoff retry executor for hardening flaky operations.

pub mod config;
pub mod error;
pub mod retry;
pub mod summary;
pub mod tools;
pub mod types;

pub use error::{DispatchError, RegistryError};
pub use retry::{retry, RetryError, RetryPolicy};
pub use summary::summarize;
pub use tools::{ToolDispatcher, ToolName, ToolRegistry};
pub use types::{ToolCall, ToolResponseEnvelope};
