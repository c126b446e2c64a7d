//! Research domain: one end-to-end query-to-report execution.
//!
//! - [`mode::ResearchMode`]: which agent subset a run uses
//! - [`state::RunState`]: the run state machine
//! - [`analysis::QueryAnalysis`]: what the Principal learned about the query
//! - [`event::LifecycleEvent`]: the ordered events a run produces
//! - [`run::ResearchRun`]: transient per-run aggregate
//! - [`result::ResearchResult`]: the final aggregate carried by `complete`

pub mod analysis;
pub mod event;
pub mod mode;
pub mod quality;
pub mod result;
pub mod run;
pub mod state;
