//! # Pipeline Coordinator
//!
//! Sequences the four stages of a query and owns everything between them:
//!
//! 1. route the question (`POST /route`)
//! 2. stop early when no agent applies
//! 3. fan out to the selected agents and wait for all of them
//! 4. audit the answers, merging when several agents were consulted
//! 5. format the audited result into markdown
//!
//! Every path ends in a [`PipelineResult`]. Router, audit and formatter
//! failures end the run with `success = false` and a user-facing message;
//! agent failures never do. Nothing is retried.
//!
//! ## Example
//!
//! ```no_run
//! use oracle::config::OracleConfig;
//! use oracle::pipeline::Coordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = Coordinator::new(&OracleConfig::default())?;
//! let result = coordinator
//!     .run("Do I need a permit to import cheese?", |event| {
//!         eprintln!("[{}] {}", event.step, event.message);
//!     })
//!     .await;
//! println!("{} (cost ${:.4})", result.response, result.total_cost);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod run;

pub use error::{FailureKind, StageError, StageName, OUT_OF_SCOPE_MESSAGE};
pub use events::{ProgressEvent, ProgressStep};
pub use run::{PipelineResult, PipelineRun, RawFlow, RunStage};

use crate::agent::AgentDispatcher;
use crate::audit::AuditClient;
use crate::client::{ServiceClient, ServiceError};
use crate::config::OracleConfig;
use crate::format::FormatterClient;
use crate::logging::{generate_run_id, truncate_question};
use crate::routing::RoutingClient;
use events::routing_message;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

enum Outcome {
    Completed,
    OutOfScope,
}

/// Runs questions through router, agents, auditor and formatter.
///
/// Holds no per-run state: concurrent calls to [`Coordinator::run`] are
/// independent.
pub struct Coordinator {
    routing: RoutingClient,
    dispatcher: AgentDispatcher,
    auditor: AuditClient,
    formatter: FormatterClient,
    content_logging: bool,
}

impl Coordinator {
    /// Build a coordinator with its own pooled HTTP client.
    pub fn new(config: &OracleConfig) -> Result<Self, ServiceError> {
        Ok(Self::with_client(config, ServiceClient::pooled()?))
    }

    /// Build a coordinator on a shared HTTP client.
    pub fn with_client(config: &OracleConfig, client: ServiceClient) -> Self {
        let services = &config.services;
        let timeouts = &config.timeouts;

        Self {
            routing: RoutingClient::new(&services.router_url, client.clone(), timeouts.router()),
            dispatcher: AgentDispatcher::new(client.clone(), services, timeouts),
            auditor: AuditClient::new(
                &services.auditor_url,
                client.clone(),
                timeouts.audit(),
                timeouts.merge_audit(),
            ),
            formatter: FormatterClient::new(&services.auditor_url, client, timeouts.formatter()),
            content_logging: config.logging.enable_content_logging,
        }
    }

    /// Run one question to a terminal result.
    ///
    /// `on_progress` is called synchronously at each checkpoint, in
    /// pipeline order. The question is not validated here; an empty one is
    /// routed like any other.
    pub async fn run<F>(&self, question: &str, mut on_progress: F) -> PipelineResult
    where
        F: FnMut(ProgressEvent),
    {
        let mut run = PipelineRun::new(generate_run_id(), question);
        let span = info_span!("pipeline", run_id = %run.run_id);

        async {
            if let Some(preview) = truncate_question(question, self.content_logging) {
                info!(question = %preview, "Pipeline started");
            } else {
                info!("Pipeline started");
            }

            let outcome = self.execute(&mut run, &mut on_progress).await;
            let result = match outcome {
                Ok(Outcome::Completed) => run.into_success(),
                Ok(Outcome::OutOfScope) => run.into_out_of_scope(),
                Err(e) => {
                    error!(stage = %e.stage, error = %e.source, "Pipeline stage failed");
                    run.into_failure(&e)
                }
            };

            let outcome_label = match result.failure {
                None => "success",
                Some(kind) => kind.as_str(),
            };
            metrics::counter!("oracle_queries_total", "outcome" => outcome_label).increment(1);
            metrics::histogram!("oracle_query_cost").record(result.total_cost);
            info!(
                success = result.success,
                outcome = outcome_label,
                started_at = %result.started_at.to_rfc3339(),
                total_cost = result.total_cost,
                duration_seconds = result.duration_seconds,
                agents = ?result.agents_consulted,
                "Pipeline finished"
            );

            result
        }
        .instrument(span)
        .await
    }

    async fn execute<F>(&self, run: &mut PipelineRun, on_progress: &mut F) -> Result<Outcome, StageError>
    where
        F: FnMut(ProgressEvent),
    {
        // 1. Route
        run.advance(RunStage::Routing);
        on_progress(ProgressEvent::new(ProgressStep::Router, None, "Analyzing question..."));

        let stage_start = Instant::now();
        let routed = self
            .routing
            .route(&run.question)
            .await
            .map_err(|e| StageError::new(StageName::Router, e))?;
        record_stage_duration("router", stage_start);

        run.add_cost(routed.cost);
        run.raw_routing = Some(routed.raw);
        let decision = routed.decision;
        run.routing = Some(decision.clone());

        info!(
            agents = ?decision.agents,
            primary_agent = %decision.primary_agent,
            confidence = decision.confidence,
            cost = routed.cost,
            "Routing decided"
        );
        on_progress(ProgressEvent::new(
            ProgressStep::Router,
            Some(&decision),
            routing_message(&decision),
        ));

        // 2. Early exit
        let primary = match decision.primary_agent.agent() {
            Some(primary) if !decision.agents.is_empty() => primary,
            _ => {
                info!(reason = %decision.reason, "Question is out of scope");
                return Ok(Outcome::OutOfScope);
            }
        };
        let is_multi = decision.is_multi();

        // 3. Fan out
        run.advance(RunStage::Dispatching);
        let progress = if is_multi {
            ProgressEvent::new(
                ProgressStep::Agents,
                Some(&decision),
                format!("Consulting {} agents in parallel...", decision.agents.len()),
            )
        } else {
            let agent = decision.agents[0];
            ProgressEvent::new(
                ProgressStep::Agent(agent),
                Some(&decision),
                format!("Consulting the {}...", agent.display_name()),
            )
        };
        on_progress(progress);

        let stage_start = Instant::now();
        let responses = self
            .dispatcher
            .dispatch_all(&run.question, &decision.agents)
            .await;
        record_stage_duration("agents", stage_start);

        for response in responses.values() {
            run.add_cost(response.cost);
        }
        run.agent_responses = responses;

        // 4. Audit
        run.advance(RunStage::Auditing);
        on_progress(ProgressEvent::new(
            ProgressStep::Auditor,
            Some(&decision),
            if is_multi {
                "Merging answers..."
            } else {
                "Validating answer..."
            },
        ));

        let stage_start = Instant::now();
        let audit = self
            .auditor
            .audit(&run.question, &run.agent_responses, primary, is_multi)
            .await
            .map_err(|e| StageError::new(StageName::Auditor, e))?;
        record_stage_duration("auditor", stage_start);
        run.add_cost(audit.result.cost);

        // 5. Format
        run.advance(RunStage::Formatting);
        let stage_start = Instant::now();
        let formatted = self.formatter.format(&audit.result).await;
        run.audit = Some(audit);
        let artifact = formatted.map_err(|e| StageError::new(StageName::Formatter, e))?;
        record_stage_duration("formatter", stage_start);

        run.formatted = Some(artifact.markdown);
        run.advance(RunStage::Done);
        on_progress(ProgressEvent::new(ProgressStep::Complete, Some(&decision), "Done"));

        Ok(Outcome::Completed)
    }
}

fn record_stage_duration(stage: &'static str, start: Instant) {
    metrics::histogram!("oracle_stage_duration_seconds", "stage" => stage)
        .record(start.elapsed().as_secs_f64());
}
