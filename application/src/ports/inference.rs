//! Inference client port
//!
//! Defines the interface for talking to the local model-serving runtime.

use async_trait::async_trait;
use localmind_domain::Model;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while generating text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// The runtime could not be reached
    #[error("inference runtime unavailable: {0}")]
    Unavailable(String),

    /// No chunk arrived within the idle window
    #[error("inference timed out after {}s without output", .0.as_secs())]
    Timeout(Duration),

    /// The runtime answered with a non-success status (unknown model, bad request)
    #[error("inference request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response stream could not be decoded
    #[error("inference protocol error: {0}")]
    Protocol(String),
}

impl InferenceError {
    /// Whether the caller may retry the request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, InferenceError::Unavailable(_))
    }
}

/// A single generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: Model,
    pub prompt: String,
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Completed generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Exactly the concatenation of every chunk passed to the callback
    pub text: String,
    pub token_count: u64,
}

/// Per-chunk callback, invoked in generation order before `generate` returns
pub type ChunkCallback<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Client for the local inference runtime
///
/// Implementations never retry internally; retry policy belongs to the caller.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Generate text for a prompt, streaming fragments to `on_chunk` if given
    async fn generate(
        &self,
        request: &GenerationRequest,
        on_chunk: Option<ChunkCallback<'_>>,
    ) -> Result<Generation, InferenceError>;

    /// Tags of the models installed on the runtime
    async fn available_models(&self) -> Result<Vec<String>, InferenceError>;
}
