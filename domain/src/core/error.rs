//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Invalid temperature {value} for agent '{agent}' (expected 0.0..=2.0)")]
    InvalidTemperature { agent: String, value: f32 },

    #[error("Invalid agent: {0}")]
    InvalidAgent(String),

    #[error("Duplicate agent name: {0}")]
    DuplicateAgent(String),

    #[error("Illegal run transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },
}
