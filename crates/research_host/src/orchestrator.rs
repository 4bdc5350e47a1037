//! Plan-then-report workflow over a single provider.
//!
//! A run moves `Idle -> Planning -> Researching -> Done`; any failure drops the
//! partial results and returns to `Idle` with an error message. Each submit
//! starts a new run number, and completions from an older run are discarded
//! instead of overwriting the newer run's state.

use crate::prompts::{build_plan_prompt, build_report_prompt};
use parking_lot::Mutex;
use providers::{normalize_sources, ProviderClient, ProviderError};
use shared::research::{ResearchResult, ResearchState, ResearchStep};
use shared::settings::{ApiProvider, ProviderConfig};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResearchError {
    #[error("Please enter a research topic.")]
    EmptyTopic,

    #[error("Failed to generate a plan. {0}")]
    Plan(#[source] ProviderError),

    #[error("Failed during research: {0}")]
    Report(#[source] ProviderError),

    #[error("Research run was superseded by a newer submission.")]
    Superseded,
}

impl ResearchError {
    /// Message recorded on the session when a run fails. Report-stage errors
    /// already carry the run prefix.
    pub fn run_message(&self) -> String {
        match self {
            ResearchError::Plan(_) => format!("Failed during research: {}", self),
            other => other.to_string(),
        }
    }
}

/// Progress notifications for front-ends that render while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchEvent {
    Planning,
    PlanReady(String),
    Researching,
    Completed(ResearchResult),
    Failed(String),
}

/// Plan stage: no search, returns the plan text as-is.
pub async fn generate_research_plan(
    topic: &str,
    client: &ProviderClient,
) -> Result<String, ResearchError> {
    let prompt = build_plan_prompt(topic);
    match client.generate(&prompt, false).await {
        Ok(generation) => Ok(generation.text),
        Err(e) => {
            tracing::error!("error generating research plan: {}", e);
            Err(ResearchError::Plan(e))
        }
    }
}

/// Report stage: search enabled, sources cleaned before they are returned.
pub async fn conduct_research(
    topic: &str,
    client: &ProviderClient,
) -> Result<ResearchResult, ResearchError> {
    let prompt = build_report_prompt(topic);
    match client.generate(&prompt, true).await {
        Ok(generation) => Ok(ResearchResult {
            report_text: generation.text,
            sources: normalize_sources(generation.sources),
        }),
        Err(e) => {
            tracing::error!("error conducting research: {}", e);
            Err(ResearchError::Report(e))
        }
    }
}

struct SessionInner {
    state: ResearchState,
    current_run: u64,
}

/// Owns the research state for one provider configuration.
///
/// The state lock is never held across an `.await`.
pub struct ResearchSession {
    client: ProviderClient,
    inner: Mutex<SessionInner>,
    events: Option<UnboundedSender<ResearchEvent>>,
}

impl ResearchSession {
    pub fn new(client: ProviderClient) -> Self {
        Self {
            client,
            inner: Mutex::new(SessionInner {
                state: ResearchState::default(),
                current_run: 0,
            }),
            events: None,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(ProviderClient::from_config(config))
    }

    pub fn with_events(mut self, tx: UnboundedSender<ResearchEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn provider(&self) -> ApiProvider {
        self.client.provider()
    }

    pub fn state(&self) -> ResearchState {
        self.inner.lock().state.clone()
    }

    fn emit(&self, event: ResearchEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Apply `update` only if `run` is still the current run.
    fn update_if_current(&self, run: u64, update: impl FnOnce(&mut ResearchState)) -> bool {
        let mut inner = self.inner.lock();
        if inner.current_run != run {
            tracing::warn!(
                "discarding result of run {} (current run is {})",
                run,
                inner.current_run
            );
            return false;
        }
        update(&mut inner.state);
        true
    }

    fn fail(&self, run: u64, err: ResearchError) -> ResearchError {
        let message = err.run_message();
        let applied = self.update_if_current(run, |state| {
            *state = ResearchState {
                step: ResearchStep::Idle,
                error: Some(message.clone()),
                ..Default::default()
            };
        });
        if !applied {
            return ResearchError::Superseded;
        }
        self.emit(ResearchEvent::Failed(message));
        err
    }

    /// Run plan then report for `topic`. A blank topic leaves the session
    /// where it is, records a validation message and makes no request. While
    /// a run is in flight its state is not touched.
    pub async fn submit(&self, topic: &str) -> Result<ResearchResult, ResearchError> {
        if topic.trim().is_empty() {
            let mut inner = self.inner.lock();
            if !inner.state.step.is_busy() {
                inner.state.error = Some(ResearchError::EmptyTopic.to_string());
            }
            return Err(ResearchError::EmptyTopic);
        }

        let run = {
            let mut inner = self.inner.lock();
            inner.current_run += 1;
            inner.state = ResearchState::planning();
            inner.current_run
        };
        tracing::info!(
            "research run {} started with {} ({})",
            run,
            self.provider(),
            self.client.model()
        );
        self.emit(ResearchEvent::Planning);

        let plan = match generate_research_plan(topic, &self.client).await {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(run, e)),
        };
        let applied = self.update_if_current(run, |state| {
            state.plan = Some(plan.clone());
            state.step = ResearchStep::Researching;
        });
        if !applied {
            return Err(ResearchError::Superseded);
        }
        tracing::info!("research run {} planned, researching", run);
        self.emit(ResearchEvent::PlanReady(plan));
        self.emit(ResearchEvent::Researching);

        let result = match conduct_research(topic, &self.client).await {
            Ok(result) => result,
            Err(e) => return Err(self.fail(run, e)),
        };
        let applied = self.update_if_current(run, |state| {
            state.report = Some(result.report_text.clone());
            state.sources = result.sources.clone();
            state.step = ResearchStep::Done;
        });
        if !applied {
            return Err(ResearchError::Superseded);
        }
        tracing::info!(
            "research run {} done with {} sources",
            run,
            result.sources.len()
        );
        self.emit(ResearchEvent::Completed(result.clone()));
        Ok(result)
    }
}
