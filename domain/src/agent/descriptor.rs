//! Agent descriptor entity

use super::role::AgentRole;
use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::Serialize;

/// Valid sampling temperature range
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// A named agent bound to one model and temperature.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDescriptor {
    name: String,
    model: Model,
    role: AgentRole,
    temperature: f32,
}

impl AgentDescriptor {
    pub fn new(
        name: impl Into<String>,
        model: Model,
        role: AgentRole,
        temperature: f32,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidAgent(format!(
                "{role} agent has an empty name"
            )));
        }
        if model.as_str().trim().is_empty() {
            return Err(DomainError::InvalidAgent(format!(
                "agent '{name}' has an empty model id"
            )));
        }
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(DomainError::InvalidTemperature {
                agent: name,
                value: temperature,
            });
        }
        Ok(Self {
            name,
            model,
            role,
            temperature,
        })
    }

    /// The stock binding for a role
    pub fn default_for(role: AgentRole) -> Self {
        Self {
            name: role.default_name().to_string(),
            model: role.default_model(),
            role,
            temperature: role.default_temperature(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for_role() {
        let d = AgentDescriptor::default_for(AgentRole::Specialist);
        assert_eq!(d.name(), "Domain Specialist");
        assert_eq!(d.model(), &Model::Qwen3_8b);
        assert_eq!(d.temperature(), 0.2);
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(AgentDescriptor::new("A", Model::Phi4Mini, AgentRole::Validator, 0.0).is_ok());
        assert!(AgentDescriptor::new("A", Model::Phi4Mini, AgentRole::Validator, 2.0).is_ok());
        let err = AgentDescriptor::new("A", Model::Phi4Mini, AgentRole::Validator, 2.1);
        assert!(matches!(err, Err(DomainError::InvalidTemperature { .. })));
    }

    #[test]
    fn test_empty_name_or_model_rejected() {
        assert!(AgentDescriptor::new(" ", Model::Phi4Mini, AgentRole::Auditor, 0.1).is_err());
        assert!(
            AgentDescriptor::new("A", Model::Custom(String::new()), AgentRole::Auditor, 0.1)
                .is_err()
        );
    }
}
