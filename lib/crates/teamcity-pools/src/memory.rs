//! In-memory agent pool server.
//!
//! Implements [`AgentPoolTransport`] with the server-side membership rules,
//! for tests and offline callers:
//!
//! - Default (id 0) exists from the start and lists every registered project.
//! - New pools get ids counting up from 1. Ids are never reused.
//! - Pool names are unique (case-sensitive).
//! - Assignment is additive and idempotent; unassignment is idempotent.
//! - Default membership is permanent: assigning to Default is a no-op,
//!   unassigning from it is refused with `InvalidOperation`. The port does
//!   not require this; it is how this server keeps Default total.
//!
//! Every operation runs inside one critical section, so concurrent
//! read-modify-write calls against the same pool are serialized.

use std::collections::{BTreeMap, BTreeSet};

use teamcity_common::{
    AgentPool, AgentPoolList, AgentPoolReference, CreateAgentPool, DEFAULT_POOL_NAME,
    DeletablePoolId, PoolError, PoolId, ProjectAgentPools, ProjectRef, Projects,
};
use tokio::sync::Mutex;

use crate::ports::AgentPoolTransport;

#[derive(Debug)]
struct PoolRecord {
    name: String,
    max_agents: Option<u32>,
    /// Explicit members. Unused for Default, whose membership is implicit.
    members: BTreeSet<String>,
}

#[derive(Debug)]
struct ServerState {
    next_id: i32,
    pools: BTreeMap<PoolId, PoolRecord>,
    projects: BTreeMap<String, ProjectRef>,
}

impl ServerState {
    fn new() -> Self {
        let mut pools = BTreeMap::new();
        pools.insert(
            PoolId::DEFAULT,
            PoolRecord {
                name: DEFAULT_POOL_NAME.to_string(),
                max_agents: None,
                members: BTreeSet::new(),
            },
        );
        Self {
            next_id: 1,
            pools,
            projects: BTreeMap::new(),
        }
    }

    fn record(&self, id: PoolId) -> Result<&PoolRecord, PoolError> {
        self.pools.get(&id).ok_or_else(|| PoolError::pool_not_found(id))
    }

    fn record_mut(&mut self, id: PoolId) -> Result<&mut PoolRecord, PoolError> {
        self.pools
            .get_mut(&id)
            .ok_or_else(|| PoolError::pool_not_found(id))
    }

    fn require_project(&self, project_id: &str) -> Result<(), PoolError> {
        if self.projects.contains_key(project_id) {
            Ok(())
        } else {
            Err(PoolError::project_not_found(project_id))
        }
    }

    fn includes(&self, id: PoolId, record: &PoolRecord, project_id: &str) -> bool {
        if id.is_default() {
            self.projects.contains_key(project_id)
        } else {
            record.members.contains(project_id)
        }
    }

    fn materialize(&self, id: PoolId, record: &PoolRecord) -> AgentPool {
        let project = if id.is_default() {
            self.projects.values().cloned().collect()
        } else {
            record
                .members
                .iter()
                .filter_map(|pid| self.projects.get(pid).cloned())
                .collect()
        };
        AgentPool {
            id,
            name: record.name.clone(),
            max_agents: record.max_agents,
            projects: Projects { project },
            href: None,
        }
    }
}

/// Agent pool server state held in process memory.
#[derive(Debug)]
pub struct InMemoryPoolServer {
    state: Mutex<ServerState>,
}

impl Default for InMemoryPoolServer {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPoolServer {
    /// A server holding only the Default pool and no projects.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServerState::new()),
        }
    }

    /// Register a project. It becomes a member of Default and nothing else.
    /// Re-registering an id only updates its display name.
    pub async fn register_project(&self, project: ProjectRef) {
        let mut state = self.state.lock().await;
        tracing::debug!(project_id = %project.id, "registered project");
        state.projects.insert(project.id.clone(), project);
    }

    /// Drop a project and every assignment that references it. Returns
    /// whether it was registered.
    pub async fn remove_project(&self, project_id: &str) -> bool {
        let mut state = self.state.lock().await;
        if state.projects.remove(project_id).is_none() {
            return false;
        }
        for record in state.pools.values_mut() {
            record.members.remove(project_id);
        }
        tracing::debug!(project_id, "removed project");
        true
    }
}

impl AgentPoolTransport for InMemoryPoolServer {
    async fn create_pool(&self, request: &CreateAgentPool) -> Result<AgentPool, PoolError> {
        let mut state = self.state.lock().await;
        if state.pools.values().any(|r| r.name == request.name) {
            return Err(PoolError::Conflict(request.name.clone()));
        }

        let id = PoolId(state.next_id);
        state.next_id = state.next_id.checked_add(1).ok_or_else(|| {
            PoolError::InvalidOperation("agent pool id space exhausted".to_string())
        })?;

        let record = PoolRecord {
            name: request.name.clone(),
            max_agents: request.max_agents,
            members: BTreeSet::new(),
        };
        let pool = state.materialize(id, &record);
        state.pools.insert(id, record);
        Ok(pool)
    }

    async fn pool_by_id(&self, id: PoolId) -> Result<AgentPool, PoolError> {
        let state = self.state.lock().await;
        let record = state.record(id)?;
        Ok(state.materialize(id, record))
    }

    async fn pool_by_name(&self, name: &str) -> Result<AgentPool, PoolError> {
        let state = self.state.lock().await;
        state
            .pools
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(&id, r)| state.materialize(id, r))
            .ok_or_else(|| PoolError::pool_not_found(name))
    }

    async fn delete_pool(&self, id: DeletablePoolId) -> Result<(), PoolError> {
        let mut state = self.state.lock().await;
        state
            .pools
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| PoolError::pool_not_found(id.get()))
    }

    async fn list_pools(&self) -> Result<AgentPoolList, PoolError> {
        let state = self.state.lock().await;
        let pools: Vec<AgentPoolReference> = state
            .pools
            .iter()
            .map(|(&id, r)| AgentPoolReference {
                id,
                name: r.name.clone(),
                href: None,
            })
            .collect();
        Ok(AgentPoolList::from(pools))
    }

    async fn pools_for_project(&self, project_id: &str) -> Result<ProjectAgentPools, PoolError> {
        let state = self.state.lock().await;
        state.require_project(project_id)?;
        let pools: Vec<AgentPoolReference> = state
            .pools
            .iter()
            .filter(|&(&id, r)| state.includes(id, r, project_id))
            .map(|(&id, r)| AgentPoolReference {
                id,
                name: r.name.clone(),
                href: None,
            })
            .collect();
        Ok(ProjectAgentPools::from(pools))
    }

    async fn assign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
        let mut state = self.state.lock().await;
        state.record(pool)?;
        state.require_project(project_id)?;
        if pool.is_default() {
            return Ok(());
        }
        let added = state.record_mut(pool)?.members.insert(project_id.to_string());
        if !added {
            tracing::debug!(pool_id = %pool, project_id, "project already assigned");
        }
        Ok(())
    }

    async fn unassign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
        let mut state = self.state.lock().await;
        let record = state.record_mut(pool)?;
        if pool.is_default() {
            return Err(PoolError::InvalidOperation(format!(
                "projects cannot be removed from the {DEFAULT_POOL_NAME} agent pool"
            )));
        }
        if !record.members.remove(project_id) {
            tracing::debug!(pool_id = %pool, project_id, "project was not assigned");
        }
        Ok(())
    }
}
