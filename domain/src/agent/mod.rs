//! Agent domain: roles, immutable model bindings and per-run status.
//!
//! Sequencing decisions are always made on [`role::AgentRole`], never on the
//! human-readable agent name.

pub mod descriptor;
pub mod role;
pub mod status;
