//! Research run types shared between the orchestrator and front-ends.

use serde::{Deserialize, Serialize};

/// A cited web source. `uri` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Output of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub report_text: String,
    /// First-seen order, unique by uri.
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ResearchStep {
    #[default]
    Idle,
    Planning,
    Researching,
    Done,
}

impl ResearchStep {
    pub fn is_busy(&self) -> bool {
        matches!(self, ResearchStep::Planning | ResearchStep::Researching)
    }
}

/// Everything a front-end needs to render the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchState {
    pub step: ResearchStep,
    pub plan: Option<String>,
    pub report: Option<String>,
    pub sources: Vec<Source>,
    pub error: Option<String>,
}

impl ResearchState {
    /// Fresh state for a new run that is about to start planning.
    pub fn planning() -> Self {
        Self {
            step: ResearchStep::Planning,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle_and_empty() {
        let state = ResearchState::default();
        assert_eq!(state.step, ResearchStep::Idle);
        assert!(state.plan.is_none());
        assert!(state.sources.is_empty());
        assert!(!state.step.is_busy());
    }

    #[test]
    fn test_planning_state_clears_previous_run() {
        let state = ResearchState::planning();
        assert_eq!(state.step, ResearchStep::Planning);
        assert!(state.step.is_busy());
        assert!(state.report.is_none());
        assert!(state.error.is_none());
    }
}
