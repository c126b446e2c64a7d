//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent;
pub mod run_research;
