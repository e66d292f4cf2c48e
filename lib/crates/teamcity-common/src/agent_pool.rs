//! Agent pool and project reference types, in the server's JSON shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// Name of the permanent pool with id 0.
pub const DEFAULT_POOL_NAME: &str = "Default";

/// Server-assigned agent pool identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub i32);

impl PoolId {
    /// The reserved, undeletable Default pool.
    pub const DEFAULT: PoolId = PoolId(0);

    #[must_use]
    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }

    /// Prove this id may be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidOperation`] for the Default pool.
    pub fn deletable(self) -> Result<DeletablePoolId, PoolError> {
        if self.is_default() {
            return Err(PoolError::InvalidOperation(format!(
                "the {DEFAULT_POOL_NAME} agent pool (id 0) cannot be deleted"
            )));
        }
        Ok(DeletablePoolId(self))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PoolId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// A pool id that is known not to be the Default pool. Only obtainable
/// through [`PoolId::deletable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeletablePoolId(PoolId);

impl DeletablePoolId {
    #[must_use]
    pub fn get(self) -> PoolId {
        self.0
    }
}

/// Project as referenced from a pool. `id` is the stable key; `name` is for
/// display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl ProjectRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// `{"project": [...]}` wrapper used inside a pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projects {
    #[serde(default)]
    pub project: Vec<ProjectRef>,
}

/// Full agent pool as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPool {
    pub id: PoolId,
    pub name: String,
    /// `None` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_agents: Option<u32>,
    #[serde(default)]
    pub projects: Projects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl AgentPool {
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.id.is_default()
    }

    /// Whether `project_id` is in this pool's project set.
    #[must_use]
    pub fn contains_project(&self, project_id: &str) -> bool {
        self.projects.project.iter().any(|p| p.id == project_id)
    }

    #[must_use]
    pub fn reference(&self) -> AgentPoolReference {
        AgentPoolReference {
            id: self.id,
            name: self.name.clone(),
            href: self.href.clone(),
        }
    }
}

/// Pool summary used in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPoolReference {
    pub id: PoolId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Pool creation request. `max_agents` omitted means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentPool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_agents: Option<u32>,
}

impl CreateAgentPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_agents: None,
        }
    }

    #[must_use]
    pub fn with_max_agents(mut self, max_agents: u32) -> Self {
        self.max_agents = Some(max_agents);
        self
    }
}

/// `GET agentPools` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPoolList {
    pub count: usize,
    #[serde(rename = "agentPool", default)]
    pub agent_pools: Vec<AgentPoolReference>,
}

impl From<Vec<AgentPoolReference>> for AgentPoolList {
    fn from(agent_pools: Vec<AgentPoolReference>) -> Self {
        Self {
            count: agent_pools.len(),
            agent_pools,
        }
    }
}

/// Pools that include a given project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAgentPools {
    pub count: usize,
    #[serde(rename = "agentPools", alias = "agentPool", default)]
    pub agent_pools: Vec<AgentPoolReference>,
}

impl ProjectAgentPools {
    #[must_use]
    pub fn contains(&self, id: PoolId) -> bool {
        self.agent_pools.iter().any(|p| p.id == id)
    }
}

impl From<Vec<AgentPoolReference>> for ProjectAgentPools {
    fn from(agent_pools: Vec<AgentPoolReference>) -> Self {
        Self {
            count: agent_pools.len(),
            agent_pools,
        }
    }
}
