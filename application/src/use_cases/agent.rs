//! Agent: one role-bound model invocation.
//!
//! Builds the role prompt, calls the inference client, and forwards every
//! chunk to the event sink attributed to the agent. Failures are returned as
//! [`AgentExecutionError`]; fallback text is the orchestrator's decision.

use crate::config::OrchestratorConfig;
use crate::ports::event_sink::EventSink;
use crate::ports::inference::{ChunkCallback, GenerationRequest, InferenceClient, InferenceError};
use localmind_domain::{AgentDescriptor, LifecycleEvent, PromptTemplate, Query, WebResult};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, warn};

/// What an agent is asked to do, beyond the query itself
#[derive(Debug, Clone, PartialEq)]
pub enum AgentContext {
    /// Structured analysis of the query (Principal)
    Analyze,
    Specialist {
        domain: String,
    },
    Research {
        aspects: Vec<String>,
        results: Vec<WebResult>,
        simulated: bool,
    },
    Validate {
        findings: String,
    },
    /// `(agent name, finding excerpt)` pairs
    Synthesize {
        findings: Vec<(String, String)>,
    },
    Audit {
        report: String,
    },
}

/// Output of a successful invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutput {
    pub agent: String,
    pub text: String,
    pub tokens: u64,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{agent_name} failed: {cause}")]
pub struct AgentExecutionError {
    pub agent_name: String,
    #[source]
    pub cause: InferenceError,
}

pub struct Agent<'a, C: InferenceClient + ?Sized> {
    descriptor: &'a AgentDescriptor,
    client: &'a C,
    config: &'a OrchestratorConfig,
}

impl<'a, C: InferenceClient + ?Sized> Agent<'a, C> {
    pub fn new(descriptor: &'a AgentDescriptor, client: &'a C, config: &'a OrchestratorConfig) -> Self {
        Self {
            descriptor,
            client,
            config,
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Role-specific prompt for a query and context
    pub fn prompt(&self, query: &Query, context: &AgentContext, today: &str) -> String {
        let query = query.content();
        match context {
            AgentContext::Analyze => PromptTemplate::analysis(query, today),
            AgentContext::Specialist { domain } => PromptTemplate::specialist(query, domain, today),
            AgentContext::Research {
                aspects,
                results,
                simulated,
            } => PromptTemplate::researcher(query, aspects, results, *simulated, today),
            AgentContext::Validate { findings } => PromptTemplate::validator(findings, today),
            AgentContext::Synthesize { findings } => {
                PromptTemplate::synthesis(query, findings, today)
            }
            AgentContext::Audit { report } => PromptTemplate::audit(report),
        }
    }

    /// Run the agent.
    ///
    /// With a sink, emits `agent_thinking`, one `agent_stream` per non-empty
    /// chunk and `agent_response`. Without one the call is silent.
    ///
    /// An unreachable runtime is retried with exponential backoff, but only
    /// while nothing has been streamed yet; replaying after the first chunk
    /// would duplicate text already delivered.
    pub async fn process(
        &self,
        query: &Query,
        context: &AgentContext,
        sink: Option<&dyn EventSink>,
    ) -> Result<AgentOutput, AgentExecutionError> {
        let name = self.descriptor.name();
        let today = chrono::Local::now().format("%B %d, %Y").to_string();
        let request = GenerationRequest {
            model: self.descriptor.model().clone(),
            prompt: self.prompt(query, context, &today),
            temperature: self.descriptor.temperature(),
            max_tokens: self.config.max_tokens,
        };

        if let Some(sink) = sink {
            sink.emit(LifecycleEvent::AgentThinking {
                agent: name.to_string(),
                model: request.model.to_string(),
                temperature: request.temperature,
            });
        }

        let streamed = AtomicBool::new(false);
        let forward = |chunk: &str| {
            if chunk.is_empty() {
                return;
            }
            streamed.store(true, Ordering::Relaxed);
            if let Some(sink) = sink {
                sink.emit(LifecycleEvent::AgentStream {
                    agent: name.to_string(),
                    chunk: chunk.to_string(),
                });
            }
        };
        let on_chunk: ChunkCallback<'_> = &forward;

        let mut attempt = 0;
        loop {
            debug!(agent = %name, model = %request.model, attempt, "Sending generation request");
            match self.client.generate(&request, Some(on_chunk)).await {
                Ok(generation) => {
                    if let Some(sink) = sink {
                        sink.emit(LifecycleEvent::AgentResponse {
                            agent: name.to_string(),
                            complete: true,
                            tokens: Some(generation.token_count),
                        });
                    }
                    return Ok(AgentOutput {
                        agent: name.to_string(),
                        text: generation.text,
                        tokens: generation.token_count,
                    });
                }
                Err(e)
                    if e.is_retryable()
                        && attempt < self.config.max_retries
                        && !streamed.load(Ordering::Relaxed) =>
                {
                    let delay = self.config.backoff_for(attempt);
                    warn!(agent = %name, "Inference failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(cause) => {
                    return Err(AgentExecutionError {
                        agent_name: name.to_string(),
                        cause,
                    });
                }
            }
        }
    }
}
