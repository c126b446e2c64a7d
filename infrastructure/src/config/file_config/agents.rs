//! Agent bindings from TOML (`[agents.<role>]` sections)

use localmind_domain::{AgentDescriptor, AgentRole, DomainError, Model};
use serde::{Deserialize, Serialize};

/// Overrides for one role; unset fields keep the role's stock binding
///
/// # Example
///
/// ```toml
/// [agents.researcher]
/// name = "Web Harvester"
/// model = "llama3.2:3b"
/// temperature = 0.4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub name: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

impl FileAgentConfig {
    /// Descriptor for `role` with these overrides applied
    pub fn to_descriptor(&self, role: AgentRole) -> Result<AgentDescriptor, DomainError> {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| role.default_name().to_string());
        let model = self
            .model
            .as_deref()
            .map(Model::from)
            .unwrap_or_else(|| role.default_model());
        let temperature = self.temperature.unwrap_or(role.default_temperature());
        AgentDescriptor::new(name, model, role, temperature)
    }
}

/// Per-role agent overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    pub synthesizer: FileAgentConfig,
    pub specialist: FileAgentConfig,
    pub researcher: FileAgentConfig,
    pub validator: FileAgentConfig,
    pub auditor: FileAgentConfig,
}

impl FileAgentsConfig {
    pub fn get(&self, role: AgentRole) -> &FileAgentConfig {
        match role {
            AgentRole::Synthesizer => &self.synthesizer,
            AgentRole::Specialist => &self.specialist,
            AgentRole::Researcher => &self.researcher,
            AgentRole::Validator => &self.validator,
            AgentRole::Auditor => &self.auditor,
        }
    }

    /// One descriptor per role, in role order
    pub fn to_descriptors(&self) -> Result<Vec<AgentDescriptor>, DomainError> {
        AgentRole::ALL
            .iter()
            .map(|role| self.get(*role).to_descriptor(*role))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_keep_stock_binding() {
        let descriptor = FileAgentConfig::default()
            .to_descriptor(AgentRole::Validator)
            .unwrap();
        assert_eq!(descriptor, AgentDescriptor::default_for(AgentRole::Validator));
    }

    #[test]
    fn test_override_model_only() {
        let toml_str = r#"
[agents.researcher]
model = "llama3.2:3b"
"#;
        let file: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let descriptor = file
            .agents
            .researcher
            .to_descriptor(AgentRole::Researcher)
            .unwrap();
        assert_eq!(descriptor.model().as_str(), "llama3.2:3b");
        assert_eq!(descriptor.name(), "Web Harvester");
        assert_eq!(descriptor.temperature(), 0.3);
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let config = FileAgentConfig {
            temperature: Some(3.5),
            ..Default::default()
        };
        assert!(matches!(
            config.to_descriptor(AgentRole::Auditor),
            Err(DomainError::InvalidTemperature { .. })
        ));
    }

    #[test]
    fn test_to_descriptors_covers_every_role() {
        let descriptors = FileAgentsConfig::default().to_descriptors().unwrap();
        let roles: Vec<_> = descriptors.iter().map(|d| d.role()).collect();
        assert_eq!(roles, AgentRole::ALL.to_vec());
    }
}
