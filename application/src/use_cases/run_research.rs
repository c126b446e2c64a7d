//! Run Research use case
//!
//! Drives one research run through the state machine:
//! analysis, parallel research, validation, synthesis (plus audit in expert
//! mode), emitting lifecycle events through a single [`EventSink`].

use crate::config::{AgentRegistry, OrchestratorConfig};
use crate::ports::event_sink::EventSink;
use crate::ports::inference::InferenceClient;
use crate::ports::telemetry::TelemetryProbe;
use crate::ports::web_search::WebSearch;
use crate::use_cases::agent::{Agent, AgentContext, AgentExecutionError, AgentOutput};
use futures::future::join_all;
use localmind_domain::util::{excerpt, extract_json_object};
use localmind_domain::{
    AgentDescriptor, AgentRole, Finding, LifecycleEvent, MemoryUsage, QualityScore, Query,
    QueryAnalysis, ResearchRequest, ResearchResult, ResearchRun, RunMetrics, RunState, WebResult,
    clean_report, simulated_results, unavailable_note,
};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors that abort a research run
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("synthesis failed: {0}")]
    SynthesisFailed(#[source] AgentExecutionError),

    #[error("research run cancelled")]
    Cancelled,
}

/// Use case for running one multi-agent research query
pub struct RunResearchUseCase<C: InferenceClient + 'static> {
    client: Arc<C>,
    registry: Arc<AgentRegistry>,
    web_search: Option<Arc<dyn WebSearch>>,
    telemetry: Option<Arc<dyn TelemetryProbe>>,
    config: OrchestratorConfig,
}

impl<C: InferenceClient + 'static> Clone for RunResearchUseCase<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            registry: Arc::clone(&self.registry),
            web_search: self.web_search.clone(),
            telemetry: self.telemetry.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: InferenceClient + 'static> RunResearchUseCase<C> {
    pub fn new(client: Arc<C>, registry: Arc<AgentRegistry>) -> Self {
        Self {
            client,
            registry,
            web_search: None,
            telemetry: None,
            config: OrchestratorConfig::default(),
        }
    }

    /// Use a live web search; without one the Web Harvester gets simulated results
    pub fn with_web_search(mut self, web_search: Arc<dyn WebSearch>) -> Self {
        self.web_search = Some(web_search);
        self
    }

    /// Sample memory usage at the start and end of each run
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetryProbe>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn has_web_search(&self) -> bool {
        self.web_search.is_some()
    }

    /// Execute until cancelled.
    ///
    /// Cancellation drops the in-flight run, including any open inference
    /// streams, and emits nothing further.
    pub async fn execute_with_cancellation(
        &self,
        request: ResearchRequest,
        sink: &dyn EventSink,
        cancellation: &CancellationToken,
    ) -> Result<ResearchResult, ResearchError> {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                info!("Research run cancelled");
                Err(ResearchError::Cancelled)
            }
            result = self.execute(request, sink) => result,
        }
    }

    /// Execute one run.
    ///
    /// Emits exactly one terminal event: `complete` on success, `error` when
    /// the Principal Synthesizer fails.
    pub async fn execute(
        &self,
        request: ResearchRequest,
        sink: &dyn EventSink,
    ) -> Result<ResearchResult, ResearchError> {
        let run = RunSink::new(ResearchRun::new(), sink);
        let query = &request.query;
        let mode = request.mode;
        let principal = self.registry.principal();

        info!(%mode, "Starting research run: {}", query);
        run.emit(LifecycleEvent::Init {
            query: query.content().to_string(),
            mode,
            timestamp: chrono::Local::now().to_rfc3339(),
        });
        let vram_baseline = self.memory_usage().await;

        // Phase 1: Analysis
        info!("Phase 1: Query Analysis");
        run.emit(LifecycleEvent::phase(RunState::Analyzing, principal.name()));
        let analysis = self.analyze(query, &run).await;

        // Phase 2: Parallel Research
        let researchers: Vec<&AgentDescriptor> = mode
            .research_roles(&analysis)
            .into_iter()
            .map(|role| self.registry.get(role))
            .collect();
        info!("Phase 2: Parallel Research ({} agents)", researchers.len());
        run.emit(LifecycleEvent::phase_many(
            RunState::ParallelResearch,
            researchers.iter().map(|d| d.name().to_string()).collect(),
        ));

        let outcomes = join_all(
            researchers
                .iter()
                .map(|descriptor| self.research(descriptor, query, &analysis, &run)),
        )
        .await;
        let mut findings: Vec<Finding> = researchers
            .iter()
            .zip(outcomes)
            .map(|(descriptor, outcome)| finding_or_placeholder(descriptor, outcome, &run))
            .collect();

        // Phase 3: Validation
        if mode.runs_validation() {
            if findings.iter().any(|f| f.available) {
                findings.push(self.validate(query, &findings, &run).await);
            } else {
                warn!("Skipping validation: no research findings available");
            }
        }

        // Phase 4: Synthesis (+ audit)
        info!("Phase 4: Synthesis");
        let auditor = mode
            .runs_audit()
            .then(|| self.registry.get(AgentRole::Auditor));
        let mut synthesis_agents = vec![principal.name().to_string()];
        if let Some(auditor) = auditor {
            synthesis_agents.push(auditor.name().to_string());
        }
        run.emit(LifecycleEvent::phase_many(
            RunState::Synthesizing,
            synthesis_agents,
        ));

        let excerpts = findings
            .iter()
            .map(|f| {
                let text = excerpt(&f.content, self.config.finding_excerpt_chars);
                (f.agent.clone(), text.to_string())
            })
            .collect();
        let synthesis = match self
            .agent(principal)
            .process(query, &AgentContext::Synthesize { findings: excerpts }, Some(&run))
            .await
        {
            Ok(output) => {
                run.check_streamed(&output);
                output
            }
            Err(e) => {
                error!("{}", e);
                run.emit(LifecycleEvent::error(e.to_string()));
                return Err(ResearchError::SynthesisFailed(e));
            }
        };

        let mut report = clean_report(&synthesis.text);
        if let Some(note) = unavailable_note(&findings) {
            report.push_str("\n\n");
            report.push_str(&note);
        }

        let quality_score = match auditor {
            Some(auditor) => self.audit(auditor, query, &report, &run).await,
            None => None,
        };

        // Complete
        let vram_peak = self.memory_usage().await;
        let agents_used = findings
            .iter()
            .filter(|f| f.available)
            .map(|f| f.agent.clone())
            .chain(std::iter::once(principal.name().to_string()))
            .collect();
        let result = run.with_run(|state| ResearchResult {
            query: query.content().to_string(),
            mode,
            analysis,
            agents_used,
            findings,
            report,
            web_search_used: state.web_search_used(),
            websites: state.web_results().to_vec(),
            metrics: RunMetrics {
                total_time: state.elapsed_secs(),
                agent_count: state.invoked_count(),
                total_tokens: state.total_tokens(),
                tokens_by_agent: state.tokens_by_agent(),
                vram_baseline,
                vram_peak,
            },
            quality_score,
            timestamp: chrono::Local::now().to_rfc3339(),
        });

        info!(
            "Research run complete in {:.1}s ({} tokens)",
            result.metrics.total_time, result.metrics.total_tokens
        );
        run.emit(LifecycleEvent::Complete {
            result: Box::new(result.clone()),
        });
        Ok(result)
    }

    async fn memory_usage(&self) -> Option<MemoryUsage> {
        match &self.telemetry {
            Some(telemetry) => telemetry.memory_usage().await,
            None => None,
        }
    }

    fn agent<'a>(&'a self, descriptor: &'a AgentDescriptor) -> Agent<'a, C> {
        Agent::new(descriptor, self.client.as_ref(), &self.config)
    }

    /// Heuristic analysis, refined by the Principal's model when enabled.
    ///
    /// Never fails: any problem falls back to the heuristic result.
    async fn analyze(&self, query: &Query, run: &RunSink<'_>) -> QueryAnalysis {
        let heuristic = QueryAnalysis::heuristic(query);
        if !self.config.model_analysis {
            debug!("Model analysis disabled, using heuristic analysis");
            return heuristic;
        }

        let principal = self.registry.principal();
        match self
            .agent(principal)
            .process(query, &AgentContext::Analyze, None)
            .await
        {
            Ok(output) => {
                run.with_run(|state| state.add_tokens(principal.name(), output.tokens));
                match extract_json_object(&output.text) {
                    Some(json) => heuristic.merge_model_json(&json),
                    None => {
                        warn!("Query analysis was not valid JSON, using heuristic analysis");
                        heuristic
                    }
                }
            }
            Err(e) => {
                warn!("Query analysis failed, using heuristic analysis: {}", e);
                heuristic
            }
        }
    }

    async fn research(
        &self,
        descriptor: &AgentDescriptor,
        query: &Query,
        analysis: &QueryAnalysis,
        run: &RunSink<'_>,
    ) -> Result<AgentOutput, AgentExecutionError> {
        let context = match descriptor.role() {
            AgentRole::Researcher => {
                run.emit(LifecycleEvent::WebSearch {
                    agent: descriptor.name().to_string(),
                });
                let (results, simulated) = self.search_web(query).await;
                run.emit(LifecycleEvent::WebResults {
                    agent: descriptor.name().to_string(),
                    count: results.len(),
                    websites: results.clone(),
                    simulated,
                });
                AgentContext::Research {
                    aspects: analysis.key_aspects.clone(),
                    results,
                    simulated,
                }
            }
            _ => AgentContext::Specialist {
                domain: analysis.domain.clone(),
            },
        };
        self.agent(descriptor)
            .process(query, &context, Some(run))
            .await
    }

    /// Live results, or a labelled simulated set when search is unconfigured,
    /// fails, or finds nothing. The flag is `true` for simulated results.
    async fn search_web(&self, query: &Query) -> (Vec<WebResult>, bool) {
        let Some(web_search) = &self.web_search else {
            debug!("Web search not configured, using simulated results");
            return (simulated_results(query.content()), true);
        };
        match web_search.search(query.content()).await {
            Ok(results) if !results.is_empty() => {
                info!("Web search returned {} results", results.len());
                (results, false)
            }
            Ok(_) => {
                warn!("Web search returned no results, using simulated results");
                (simulated_results(query.content()), true)
            }
            Err(e) => {
                warn!("Web search failed, using simulated results: {}", e);
                (simulated_results(query.content()), true)
            }
        }
    }

    async fn validate(&self, query: &Query, findings: &[Finding], run: &RunSink<'_>) -> Finding {
        info!("Phase 3: Validation");
        let validator = self.registry.get(AgentRole::Validator);
        run.emit(LifecycleEvent::phase(RunState::Validating, validator.name()));

        let combined = findings
            .iter()
            .filter(|f| f.available)
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let context = AgentContext::Validate {
            findings: excerpt(&combined, self.config.validation_excerpt_chars).to_string(),
        };
        let outcome = self
            .agent(validator)
            .process(query, &context, Some(run))
            .await;
        finding_or_placeholder(validator, outcome, run)
    }

    async fn audit(
        &self,
        auditor: &AgentDescriptor,
        query: &Query,
        report: &str,
        run: &RunSink<'_>,
    ) -> Option<QualityScore> {
        let context = AgentContext::Audit {
            report: excerpt(report, self.config.audit_excerpt_chars).to_string(),
        };
        match self.agent(auditor).process(query, &context, Some(run)).await {
            Ok(output) => Some(QualityScore::parse(&output.text).unwrap_or_else(|| {
                warn!("Quality audit was not valid JSON, using neutral score");
                QualityScore::default()
            })),
            Err(e) => {
                warn!("{}", e);
                run.emit(LifecycleEvent::AgentError {
                    agent: auditor.name().to_string(),
                    error: e.cause.to_string(),
                });
                None
            }
        }
    }
}

/// Contain a non-Principal failure: report it and substitute a placeholder
fn finding_or_placeholder(
    descriptor: &AgentDescriptor,
    outcome: Result<AgentOutput, AgentExecutionError>,
    run: &RunSink<'_>,
) -> Finding {
    match outcome {
        Ok(output) => {
            run.check_streamed(&output);
            Finding::success(output.agent, output.text)
        }
        Err(e) => {
            warn!("{}", e);
            run.emit(LifecycleEvent::AgentError {
                agent: descriptor.name().to_string(),
                error: e.cause.to_string(),
            });
            Finding::unavailable(descriptor.name(), &e.cause)
        }
    }
}

/// Per-run sink: folds every event into the run state, then forwards it.
///
/// Both happen under one lock, so the run state always reflects exactly the
/// events the downstream sink has seen, in the same order.
struct RunSink<'a> {
    run: Mutex<ResearchRun>,
    downstream: &'a dyn EventSink,
}

impl<'a> RunSink<'a> {
    fn new(run: ResearchRun, downstream: &'a dyn EventSink) -> Self {
        Self {
            run: Mutex::new(run),
            downstream,
        }
    }

    fn with_run<R>(&self, f: impl FnOnce(&mut ResearchRun) -> R) -> R {
        let mut run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut run)
    }

    /// Warn when the chunks forwarded for an agent differ from its output
    fn check_streamed(&self, output: &AgentOutput) {
        if !self.with_run(|run| run.streamed_matches(&output.agent, &output.text)) {
            warn!(agent = %output.agent, "Streamed chunks do not match the agent output");
        }
    }
}

impl EventSink for RunSink<'_> {
    fn emit(&self, event: LifecycleEvent) {
        self.with_run(|run| {
            if let Err(e) = run.apply(&event) {
                warn!("Run state rejected {} event: {}", event.type_name(), e);
            }
            let elapsed = run.elapsed_secs();
            self.downstream.emit_timed(event, elapsed);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::event_sink::NoEvents;
    use crate::ports::inference::{ChunkCallback, Generation, GenerationRequest, InferenceError};
    use crate::ports::telemetry::HostTelemetry;
    use crate::ports::web_search::WebSearchError;
    use async_trait::async_trait;
    use localmind_domain::ResearchMode;
    use std::collections::{HashMap, VecDeque};
    use std::time::Duration;

    // ==================== Test Doubles ====================

    #[derive(Clone)]
    enum Reply {
        Chunks(Vec<&'static str>),
        Fail(InferenceError),
    }

    /// Scripted inference client: replies are queued per model tag
    struct ScriptedClient {
        replies: Mutex<HashMap<String, VecDeque<Reply>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self {
                replies: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn script(self, model: &str, replies: Vec<Reply>) -> Self {
            self.replies
                .lock()
                .unwrap()
                .entry(model.to_string())
                .or_default()
                .extend(replies);
            self
        }

        fn calls_to(&self, model: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|m| *m == model).count()
        }
    }

    #[async_trait]
    impl InferenceClient for ScriptedClient {
        async fn generate(
            &self,
            request: &GenerationRequest,
            on_chunk: Option<ChunkCallback<'_>>,
        ) -> Result<Generation, InferenceError> {
            let model = request.model.to_string();
            self.calls.lock().unwrap().push(model.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .get_mut(&model)
                .and_then(|queue| queue.pop_front())
                .unwrap_or(Reply::Chunks(vec!["Default ", "answer ", "from ", "model."]));

            // Yield so concurrently running agents interleave
            tokio::task::yield_now().await;
            match reply {
                Reply::Chunks(chunks) => {
                    for chunk in chunks.iter().copied() {
                        if let Some(cb) = on_chunk {
                            cb(chunk);
                        }
                        tokio::task::yield_now().await;
                    }
                    Ok(Generation {
                        text: chunks.concat(),
                        token_count: chunks.len() as u64,
                    })
                }
                Reply::Fail(e) => Err(e),
            }
        }

        async fn available_models(&self) -> Result<Vec<String>, InferenceError> {
            Ok(vec![])
        }
    }

    struct FixedSearch(Result<Vec<WebResult>, WebSearchError>);

    #[async_trait]
    impl WebSearch for FixedSearch {
        async fn search(&self, _query: &str) -> Result<Vec<WebResult>, WebSearchError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<LifecycleEvent>>,
        stamps: Mutex<Vec<f64>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<LifecycleEvent> {
            self.events.lock().unwrap().clone()
        }

        fn stamps(&self) -> Vec<f64> {
            self.stamps.lock().unwrap().clone()
        }

        fn types(&self) -> Vec<&'static str> {
            self.events().iter().map(|e| e.type_name()).collect()
        }

        fn phases(&self) -> Vec<RunState> {
            self.events()
                .iter()
                .filter_map(|e| match e {
                    LifecycleEvent::Phase { phase, .. } => Some(*phase),
                    _ => None,
                })
                .collect()
        }

        fn streamed_text(&self, agent: &str) -> String {
            self.events()
                .iter()
                .filter_map(|e| match e {
                    LifecycleEvent::AgentStream { agent: a, chunk } if a == agent => {
                        Some(chunk.clone())
                    }
                    _ => None,
                })
                .collect()
        }

        fn terminal_count(&self) -> usize {
            self.events().iter().filter(|e| e.is_terminal()).count()
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: LifecycleEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn emit_timed(&self, event: LifecycleEvent, elapsed: f64) {
            self.stamps.lock().unwrap().push(elapsed);
            self.emit(event);
        }
    }

    /// Reports 2 GB in use on the first sample, then 5 GB
    #[derive(Default)]
    struct GrowingMemory(Mutex<u32>);

    #[async_trait]
    impl TelemetryProbe for GrowingMemory {
        async fn snapshot(&self) -> HostTelemetry {
            HostTelemetry {
                platform: "test".to_string(),
                processor: "test".to_string(),
                cpu_cores: 1,
                memory_gb: 8.0,
                gpu: "test".to_string(),
                vram: None,
                cpu_temp: None,
                fans: vec![],
                thermal_available: false,
            }
        }

        async fn memory_usage(&self) -> Option<MemoryUsage> {
            let mut samples = self.0.lock().unwrap();
            *samples += 1;
            let used = if *samples == 1 { 2048.0 } else { 5120.0 };
            MemoryUsage::from_mib(used, 8192.0)
        }
    }

    const ANALYSIS_JSON: &str = r#"{"complexity": "moderate", "domain": "technology", "agents_needed": ["Domain Specialist", "Web Harvester"], "strategy": "parallel", "key_aspects": ["alignment", "policy"]}"#;

    fn use_case(client: ScriptedClient) -> RunResearchUseCase<ScriptedClient> {
        RunResearchUseCase::new(Arc::new(client), Arc::new(AgentRegistry::default())).with_config(
            OrchestratorConfig::default().with_retry_backoff(Duration::from_millis(1)),
        )
    }

    fn request(query: &str, mode: ResearchMode) -> ResearchRequest {
        ResearchRequest::new(Query::try_new(query).unwrap(), mode)
    }

    fn principal_script() -> Vec<Reply> {
        vec![
            Reply::Chunks(vec![ANALYSIS_JSON]),
            Reply::Chunks(vec!["<think>plan</think>", "# Executive Summary\n", "Safety matters."]),
        ]
    }

    // ==================== Scenarios ====================

    #[tokio::test]
    async fn test_auto_mode_current_events_scenario() {
        let client = ScriptedClient::new().script("deepseek-r1:8b", principal_script());
        let use_case = use_case(client);
        let sink = RecordingSink::default();

        let result = use_case
            .execute(request("Latest AI safety developments", ResearchMode::Auto), &sink)
            .await
            .unwrap();

        let types = sink.types();
        assert_eq!(types[0], "init");
        assert_eq!(types[1], "phase");
        assert_eq!(types.last(), Some(&"complete"));
        assert_eq!(
            sink.phases(),
            vec![
                RunState::Analyzing,
                RunState::ParallelResearch,
                RunState::Validating,
                RunState::Synthesizing
            ]
        );

        let research_agents = sink
            .events()
            .into_iter()
            .find_map(|e| match e {
                LifecycleEvent::Phase {
                    phase: RunState::ParallelResearch,
                    agents,
                    ..
                } => agents,
                _ => None,
            })
            .unwrap();
        assert!(research_agents.contains(&"Domain Specialist".to_string()));
        assert!(research_agents.contains(&"Web Harvester".to_string()));

        assert_eq!(sink.terminal_count(), 1);
        assert_eq!(
            result.agents_used,
            vec![
                "Domain Specialist".to_string(),
                "Web Harvester".to_string(),
                "Fact Validator".to_string(),
                "Principal Synthesizer".to_string(),
            ]
        );
        assert_eq!(result.report, "# Executive Summary\nSafety matters.");
        assert!(result.analysis.model_assisted);
        assert_eq!(result.analysis.key_aspects, vec!["alignment", "policy"]);
        assert!(result.quality_score.is_none());
    }

    #[tokio::test]
    async fn test_specialist_timeout_yields_placeholder() {
        let client = ScriptedClient::new()
            .script("deepseek-r1:8b", principal_script())
            .script(
                "qwen3:8b",
                vec![Reply::Fail(InferenceError::Timeout(Duration::from_secs(120)))],
            );
        let use_case = use_case(client);
        let sink = RecordingSink::default();

        let result = use_case
            .execute(request("Latest AI safety developments", ResearchMode::Auto), &sink)
            .await
            .unwrap();

        let errors: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|e| e.type_name() == "agent_error")
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].agent(), Some("Domain Specialist"));

        assert_eq!(sink.types().last(), Some(&"complete"));
        assert!(result.report.contains("Domain Specialist unavailable"));
        assert!(!result.agents_used.contains(&"Domain Specialist".to_string()));
        assert!(!result.finding("Domain Specialist").unwrap().available);
        // timeouts are never retried
        assert_eq!(use_case.client.calls_to("qwen3:8b"), 1);
    }

    #[tokio::test]
    async fn test_principal_failure_fails_run() {
        let client = ScriptedClient::new().script(
            "deepseek-r1:8b",
            vec![
                Reply::Chunks(vec![ANALYSIS_JSON]),
                Reply::Fail(InferenceError::Rejected {
                    status: 404,
                    message: "model 'deepseek-r1:8b' not found".to_string(),
                }),
            ],
        );
        let use_case = use_case(client);
        let sink = RecordingSink::default();

        let err = use_case
            .execute(request("Latest AI safety developments", ResearchMode::Auto), &sink)
            .await
            .unwrap_err();

        assert!(matches!(err, ResearchError::SynthesisFailed(_)));
        assert_eq!(sink.types().last(), Some(&"error"));
        assert_eq!(sink.terminal_count(), 1);
        assert!(!sink.types().contains(&"complete"));
    }

    #[tokio::test]
    async fn test_simple_mode_without_web_search_uses_simulated_results() {
        let use_case = use_case(ScriptedClient::new());
        let sink = RecordingSink::default();

        let result = use_case
            .execute(request("What is quantum computing?", ResearchMode::Simple), &sink)
            .await
            .unwrap();

        let (websites, simulated) = sink
            .events()
            .into_iter()
            .find_map(|e| match e {
                LifecycleEvent::WebResults {
                    websites, simulated, ..
                } => Some((websites, simulated)),
                _ => None,
            })
            .unwrap();
        assert!(simulated);
        assert!(!websites.is_empty());
        assert!(websites.iter().all(WebResult::is_simulated));

        assert!(!result.web_search_used);
        assert_eq!(
            result.agents_used,
            vec!["Web Harvester".to_string(), "Principal Synthesizer".to_string()]
        );
        assert!(!sink.phases().contains(&RunState::Validating));
        let types = sink.types();
        let search = types.iter().position(|t| *t == "web_search").unwrap();
        let results = types.iter().position(|t| *t == "web_results").unwrap();
        assert!(search < results);
    }

    #[tokio::test]
    async fn test_live_web_search_results_are_used() {
        let live = vec![WebResult::new(
            "Qubit primer",
            "https://example.org/qubits",
            "Superposition explained",
        )];
        let use_case = use_case(ScriptedClient::new())
            .with_web_search(Arc::new(FixedSearch(Ok(live.clone()))));
        let sink = RecordingSink::default();

        let result = use_case
            .execute(request("What is quantum computing?", ResearchMode::Simple), &sink)
            .await
            .unwrap();

        assert!(result.web_search_used);
        assert_eq!(result.websites, live);
    }

    #[tokio::test]
    async fn test_failed_or_empty_web_search_falls_back() {
        for outcome in [
            Err(WebSearchError::Unavailable("HTTP 429".to_string())),
            Ok(vec![]),
        ] {
            let use_case = use_case(ScriptedClient::new())
                .with_web_search(Arc::new(FixedSearch(outcome)));
            let result = use_case
                .execute(request("What is quantum computing?", ResearchMode::Simple), &NoEvents)
                .await
                .unwrap();
            assert!(!result.web_search_used);
            assert!(!result.websites.is_empty());
        }
    }

    #[tokio::test]
    async fn test_streamed_chunks_concatenate_to_outputs() {
        let client = ScriptedClient::new()
            .script("deepseek-r1:8b", principal_script())
            .script("qwen3:8b", vec![Reply::Chunks(vec!["Alignment ", "is ", "hard."])])
            .script("qwen3:4b", vec![Reply::Chunks(vec!["Labs ", "", "published."])]);
        let use_case = use_case(client);
        let sink = RecordingSink::default();

        let result = use_case
            .execute(request("Latest AI safety developments", ResearchMode::Expert), &sink)
            .await
            .unwrap();

        for finding in &result.findings {
            assert_eq!(sink.streamed_text(&finding.agent), finding.content);
        }
        assert_eq!(
            sink.streamed_text("Principal Synthesizer"),
            "<think>plan</think># Executive Summary\nSafety matters."
        );
    }

    #[tokio::test]
    async fn test_expert_mode_runs_quality_audit() {
        let client = ScriptedClient::new()
            .script("deepseek-r1:8b", principal_script())
            .script(
                "phi4-mini",
                vec![
                    Reply::Chunks(vec!["Claim 1: High confidence."]),
                    Reply::Chunks(vec![
                        r#"{"accuracy": 9, "completeness": 8, "clarity": 9, "actionability": 7, "overall": 8.5}"#,
                    ]),
                ],
            );
        let use_case = use_case(client);
        let sink = RecordingSink::default();

        let result = use_case
            .execute(
                request("How to deploy enterprise AI systems locally?", ResearchMode::Expert),
                &sink,
            )
            .await
            .unwrap();

        let score = result.quality_score.unwrap();
        assert_eq!(score.overall, 8.5);
        assert!(!result.agents_used.contains(&"Quality Auditor".to_string()));
        assert!(result.metrics.tokens_by_agent.contains_key("Quality Auditor"));
        assert_eq!(result.metrics.agent_count, 5);

        let synthesis_agents = sink
            .events()
            .into_iter()
            .find_map(|e| match e {
                LifecycleEvent::Phase {
                    phase: RunState::Synthesizing,
                    agents,
                    ..
                } => agents,
                _ => None,
            })
            .unwrap();
        assert_eq!(
            synthesis_agents,
            vec!["Principal Synthesizer".to_string(), "Quality Auditor".to_string()]
        );
    }

    #[tokio::test]
    async fn test_validator_failure_degrades_run() {
        let client = ScriptedClient::new()
            .script("deepseek-r1:8b", principal_script())
            .script(
                "phi4-mini",
                vec![Reply::Fail(InferenceError::Protocol("truncated stream".to_string()))],
            );
        let use_case = use_case(client);
        let sink = RecordingSink::default();

        let result = use_case
            .execute(request("Latest AI safety developments", ResearchMode::Auto), &sink)
            .await
            .unwrap();

        assert_eq!(sink.types().last(), Some(&"complete"));
        assert!(result.report.contains("Fact Validator unavailable"));
    }

    #[tokio::test]
    async fn test_unparsable_analysis_falls_back_to_heuristics() {
        let client = ScriptedClient::new().script(
            "deepseek-r1:8b",
            vec![
                Reply::Chunks(vec!["I think ", "this is about physics."]),
                Reply::Chunks(vec!["Report."]),
            ],
        );
        let use_case = use_case(client);

        let result = use_case
            .execute(request("Explain photosynthesis", ResearchMode::Auto), &NoEvents)
            .await
            .unwrap();

        assert!(!result.analysis.model_assisted);
        assert_eq!(
            result.agents_used,
            vec![
                "Domain Specialist".to_string(),
                "Fact Validator".to_string(),
                "Principal Synthesizer".to_string()
            ]
        );
        // analysis (2) + synthesis (1) tokens
        assert_eq!(result.metrics.tokens_by_agent["Principal Synthesizer"], 3);
    }

    #[tokio::test]
    async fn test_model_analysis_can_be_disabled() {
        let use_case = use_case(ScriptedClient::new());
        let use_case = use_case.clone().with_config(
            OrchestratorConfig::default().with_model_analysis(false),
        );

        use_case
            .execute(request("What is quantum computing?", ResearchMode::Simple), &NoEvents)
            .await
            .unwrap();
        // synthesis only
        assert_eq!(use_case.client.calls_to("deepseek-r1:8b"), 1);
    }

    #[tokio::test]
    async fn test_runs_are_independent() {
        let use_case = use_case(ScriptedClient::new());
        let first = RecordingSink::default();
        let second = RecordingSink::default();

        let a = use_case
            .execute(request("What is quantum computing?", ResearchMode::Simple), &first)
            .await
            .unwrap();
        let b = use_case
            .execute(request("What is quantum computing?", ResearchMode::Simple), &second)
            .await
            .unwrap();

        assert_eq!(a.metrics.total_tokens, b.metrics.total_tokens);
        assert_eq!(first.types(), second.types());
    }

    #[tokio::test]
    async fn test_cancelled_run_emits_nothing_further() {
        let use_case = use_case(ScriptedClient::new());
        let sink = RecordingSink::default();
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case
            .execute_with_cancellation(
                request("What is quantum computing?", ResearchMode::Simple),
                &sink,
                &token,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ResearchError::Cancelled));
        assert_eq!(sink.terminal_count(), 0);
    }

    #[tokio::test]
    async fn test_every_run_event_is_stamped_in_order() {
        let use_case = use_case(ScriptedClient::new());
        let sink = RecordingSink::default();

        use_case
            .execute(request("What is quantum computing?", ResearchMode::Simple), &sink)
            .await
            .unwrap();

        let stamps = sink.stamps();
        assert_eq!(stamps.len(), sink.events().len());
        assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn test_memory_sampled_at_start_and_completion() {
        let use_case =
            use_case(ScriptedClient::new()).with_telemetry(Arc::new(GrowingMemory::default()));

        let result = use_case
            .execute(request("What is quantum computing?", ResearchMode::Simple), &NoEvents)
            .await
            .unwrap();

        assert_eq!(result.metrics.vram_baseline.unwrap().used_gb, 2.0);
        assert_eq!(result.metrics.vram_peak.unwrap().used_gb, 5.0);
    }

    #[tokio::test]
    async fn test_memory_absent_without_telemetry() {
        let result = use_case(ScriptedClient::new())
            .execute(request("What is quantum computing?", ResearchMode::Simple), &NoEvents)
            .await
            .unwrap();

        assert!(result.metrics.vram_baseline.is_none());
        assert!(result.metrics.vram_peak.is_none());
    }
}
