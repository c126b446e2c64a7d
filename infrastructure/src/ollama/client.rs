//! Streaming Ollama client

use super::protocol::{
    ErrorBody, GenerateChunk, GenerateOptions, GenerateRequest, LineDecoder, TagsResponse,
};
use async_trait::async_trait;
use futures::StreamExt;
use localmind_application::{
    ChunkCallback, Generation, GenerationRequest, InferenceClient, InferenceError,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// [`InferenceClient`] backed by an Ollama runtime's HTTP API.
///
/// Generation always streams (`stream: true`); each NDJSON line's `response`
/// fragment is forwarded to the chunk callback as it arrives. A call is
/// abandoned with [`InferenceError::Timeout`] when no line arrives within the
/// idle timeout, so slow-but-progressing generations are never cut off.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    idle_timeout: Duration,
    connect_timeout: Duration,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        idle_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            idle_timeout,
            connect_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        on_chunk: Option<ChunkCallback<'_>>,
    ) -> Result<Generation, InferenceError> {
        let body = GenerateRequest {
            model: request.model.as_str(),
            prompt: &request.prompt,
            stream: true,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        debug!(model = %request.model, "Sending generate request");
        let send = self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&body)
            .send();
        let response = timeout(self.idle_timeout, send)
            .await
            .map_err(|_| InferenceError::Timeout(self.idle_timeout))?
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| {
                    if text.trim().is_empty() {
                        status.to_string()
                    } else {
                        text.trim().to_string()
                    }
                });
            return Err(InferenceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = LineDecoder::default();
        let mut output = StreamState::default();

        while !output.done {
            let next = timeout(self.idle_timeout, stream.next())
                .await
                .map_err(|_| InferenceError::Timeout(self.idle_timeout))?;
            match next {
                Some(Ok(bytes)) => {
                    for line in decoder.push(&bytes) {
                        output.apply(&line, on_chunk)?;
                    }
                }
                Some(Err(e)) => return Err(request_error(e)),
                None => break,
            }
        }
        if let Some(line) = decoder.finish() {
            output.apply(&line, on_chunk)?;
        }
        if !output.done {
            warn!(model = %request.model, "Generate stream ended without a final line");
        }

        let token_count = output
            .eval_count
            .unwrap_or_else(|| output.text.split_whitespace().count() as u64);
        Ok(Generation {
            text: output.text,
            token_count,
        })
    }

    async fn available_models(&self) -> Result<Vec<String>, InferenceError> {
        let response = self
            .http
            .get(self.endpoint("/api/tags"))
            .timeout(self.connect_timeout * 2)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Rejected {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Protocol(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// Accumulated output of one streamed generation
#[derive(Default)]
struct StreamState {
    text: String,
    eval_count: Option<u64>,
    done: bool,
}

impl StreamState {
    fn apply(&mut self, line: &str, on_chunk: Option<ChunkCallback<'_>>) -> Result<(), InferenceError> {
        if self.done {
            return Ok(());
        }
        let chunk: GenerateChunk = serde_json::from_str(line)
            .map_err(|e| InferenceError::Protocol(format!("undecodable stream line: {e}")))?;
        if let Some(error) = chunk.error {
            return Err(InferenceError::Protocol(error));
        }
        if !chunk.response.is_empty() {
            if let Some(callback) = on_chunk {
                callback(&chunk.response);
            }
            self.text.push_str(&chunk.response);
        }
        if chunk.done {
            self.eval_count = chunk.eval_count;
            self.done = true;
        }
        Ok(())
    }
}

fn request_error(error: reqwest::Error) -> InferenceError {
    if error.is_decode() {
        InferenceError::Protocol(error.to_string())
    } else {
        InferenceError::Unavailable(error.to_string())
    }
}
