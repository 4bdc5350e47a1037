//! Research Host - plan-then-report research runs
//!
//! This crate drives a research run against the configured provider:
//! - Builds the plan and report prompts from the user's topic
//! - Generates a research plan, then a cited report
//! - Tracks run state for the front-end and discards stale runs

pub mod orchestrator;
pub mod prompts;

pub use orchestrator::{
    conduct_research, generate_research_plan, ResearchError, ResearchEvent, ResearchSession,
};
pub use prompts::{build_plan_prompt, build_report_prompt};
