//! Agent registry: exactly one agent per role.

use localmind_domain::{AgentDescriptor, AgentRole, Model};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("no agent configured for role '{0}'")]
    MissingRole(AgentRole),

    #[error("more than one agent configured for role '{0}'")]
    DuplicateRole(AgentRole),

    #[error("agent name '{0}' is used more than once")]
    DuplicateName(String),
}

/// The model bindings for every role.
///
/// Built once at startup and shared read-only (behind an `Arc`) across all
/// connections, so no locking is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRegistry {
    synthesizer: AgentDescriptor,
    specialist: AgentDescriptor,
    researcher: AgentDescriptor,
    validator: AgentDescriptor,
    auditor: AgentDescriptor,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self {
            synthesizer: AgentDescriptor::default_for(AgentRole::Synthesizer),
            specialist: AgentDescriptor::default_for(AgentRole::Specialist),
            researcher: AgentDescriptor::default_for(AgentRole::Researcher),
            validator: AgentDescriptor::default_for(AgentRole::Validator),
            auditor: AgentDescriptor::default_for(AgentRole::Auditor),
        }
    }
}

impl AgentRegistry {
    /// Build from a list of descriptors covering every role exactly once
    pub fn new(agents: Vec<AgentDescriptor>) -> Result<Self, RegistryError> {
        let mut names = HashSet::new();
        for agent in &agents {
            if !names.insert(agent.name().to_string()) {
                return Err(RegistryError::DuplicateName(agent.name().to_string()));
            }
        }

        let mut slots: [Option<AgentDescriptor>; 5] = Default::default();
        for agent in agents {
            let slot = &mut slots[role_index(agent.role())];
            if slot.is_some() {
                return Err(RegistryError::DuplicateRole(agent.role()));
            }
            *slot = Some(agent);
        }

        let [synthesizer, specialist, researcher, validator, auditor] = slots;
        let take = |slot: Option<AgentDescriptor>, role| slot.ok_or(RegistryError::MissingRole(role));
        Ok(Self {
            synthesizer: take(synthesizer, AgentRole::Synthesizer)?,
            specialist: take(specialist, AgentRole::Specialist)?,
            researcher: take(researcher, AgentRole::Researcher)?,
            validator: take(validator, AgentRole::Validator)?,
            auditor: take(auditor, AgentRole::Auditor)?,
        })
    }

    pub fn get(&self, role: AgentRole) -> &AgentDescriptor {
        match role {
            AgentRole::Synthesizer => &self.synthesizer,
            AgentRole::Specialist => &self.specialist,
            AgentRole::Researcher => &self.researcher,
            AgentRole::Validator => &self.validator,
            AgentRole::Auditor => &self.auditor,
        }
    }

    /// The Principal agent
    pub fn principal(&self) -> &AgentDescriptor {
        &self.synthesizer
    }

    /// All agents in role order
    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        AgentRole::ALL.into_iter().map(|role| self.get(role))
    }

    /// Distinct models with the names of the agents bound to each
    pub fn models(&self) -> Vec<(Model, Vec<String>)> {
        let mut models: Vec<(Model, Vec<String>)> = Vec::new();
        for agent in self.iter() {
            match models.iter_mut().find(|(m, _)| m == agent.model()) {
                Some((_, names)) => names.push(agent.name().to_string()),
                None => models.push((agent.model().clone(), vec![agent.name().to_string()])),
            }
        }
        models
    }
}

fn role_index(role: AgentRole) -> usize {
    match role {
        AgentRole::Synthesizer => 0,
        AgentRole::Specialist => 1,
        AgentRole::Researcher => 2,
        AgentRole::Validator => 3,
        AgentRole::Auditor => 4,
    }
}
