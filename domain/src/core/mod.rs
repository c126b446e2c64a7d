//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: models served by the local inference runtime
//! - [`query::Query`]: a validated research query
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod query;
