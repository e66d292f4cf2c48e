//! Application service — agent pool lifecycle and project membership.
//!
//! All I/O is routed through the injected [`AgentPoolTransport`]. The service
//! validates arguments, keeps the Default pool out of reach of delete, and
//! normalises listing counts. It never retries: every error reaches the
//! caller unchanged.

use teamcity_common::{
    AgentPool, AgentPoolReference, CreateAgentPool, PoolError, PoolId, ProjectAgentPools,
};

use crate::ports::AgentPoolTransport;

/// Agent pool operations backed by a transport collaborator.
#[derive(Debug, Clone)]
pub struct AgentPools<T> {
    transport: T,
}

impl<T: AgentPoolTransport> AgentPools<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a pool.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank name, `Conflict` if the server already
    /// has a pool with that name. A server answer carrying the reserved id 0
    /// is reported as a transport error.
    pub async fn create(&self, request: CreateAgentPool) -> Result<AgentPool, PoolError> {
        if request.name.trim().is_empty() {
            return Err(PoolError::InvalidArgument(
                "agent pool name must not be blank".to_string(),
            ));
        }

        let pool = self
            .transport
            .create_pool(&request)
            .await
            .inspect_err(|e| {
                tracing::warn!(name = %request.name, error = %e, "agent pool creation failed");
            })?;

        if pool.is_default() {
            return Err(PoolError::Transport(anyhow::anyhow!(
                "server assigned the reserved id 0 to new pool '{}'",
                request.name
            )));
        }

        tracing::info!(pool_id = %pool.id, name = %pool.name, "created agent pool");
        Ok(pool)
    }

    /// # Errors
    ///
    /// `NotFound` if no pool has this id.
    pub async fn get_by_id(&self, id: PoolId) -> Result<AgentPool, PoolError> {
        tracing::debug!(pool_id = %id, "fetching agent pool");
        self.transport.pool_by_id(id).await
    }

    /// # Errors
    ///
    /// `NotFound` if no pool has this name.
    pub async fn get_by_name(&self, name: &str) -> Result<AgentPool, PoolError> {
        tracing::debug!(name, "fetching agent pool by name");
        self.transport.pool_by_name(name).await
    }

    /// The permanent Default pool.
    ///
    /// # Errors
    ///
    /// Only transport failures.
    pub async fn default_pool(&self) -> Result<AgentPool, PoolError> {
        self.get_by_id(PoolId::DEFAULT).await
    }

    /// Delete a pool and, with it, all of its project assignments.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for the Default pool (the transport is not
    /// contacted), `NotFound` for an unknown id.
    pub async fn delete(&self, id: PoolId) -> Result<(), PoolError> {
        let id = id.deletable().inspect_err(|e| {
            tracing::warn!(pool_id = %id, error = %e, "refused to delete agent pool");
        })?;
        self.transport.delete_pool(id).await?;
        tracing::info!(pool_id = %id.get(), "deleted agent pool");
        Ok(())
    }

    /// Every pool. Order is whatever the server returns.
    ///
    /// # Errors
    ///
    /// Transport failures, or a listing that lacks the Default pool.
    pub async fn list(&self) -> Result<Vec<AgentPoolReference>, PoolError> {
        let pools = self.transport.list_pools().await?.agent_pools;
        if !pools.iter().any(|p| p.id.is_default()) {
            return Err(PoolError::Transport(anyhow::anyhow!(
                "agent pool listing does not include the Default pool"
            )));
        }
        tracing::debug!(count = pools.len(), "listed agent pools");
        Ok(pools)
    }

    /// Pools whose project set contains `project_id`. `count` always equals
    /// the number of pools returned, whatever the server reported.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty id, `NotFound` for an unknown project.
    pub async fn list_for_project(&self, project_id: &str) -> Result<ProjectAgentPools, PoolError> {
        require_project_id(project_id)?;
        let pools = self.transport.pools_for_project(project_id).await?;
        let pools = ProjectAgentPools::from(pools.agent_pools);
        tracing::debug!(project_id, count = pools.count, "listed agent pools for project");
        Ok(pools)
    }

    /// Add `project_id` to the pool. Already-assigned is success. Other
    /// pools keep the project.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty id, `NotFound` for an unknown pool or
    /// project.
    pub async fn assign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
        require_project_id(project_id)?;
        self.transport.assign_project(pool, project_id).await?;
        tracing::info!(pool_id = %pool, project_id, "assigned project to agent pool");
        Ok(())
    }

    /// Remove `project_id` from the pool. Not-assigned is success.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty id, `NotFound` for an unknown pool.
    /// Any other server error is passed through unchanged. Refusing to
    /// unassign from the Default pool (`InvalidOperation` from
    /// [`InMemoryPoolServer`](crate::InMemoryPoolServer)) is that server's
    /// policy, not part of this operation's contract.
    pub async fn unassign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
        require_project_id(project_id)?;
        self.transport
            .unassign_project(pool, project_id)
            .await
            .inspect_err(|e| {
                tracing::warn!(pool_id = %pool, project_id, error = %e, "unassign failed");
            })?;
        tracing::info!(pool_id = %pool, project_id, "unassigned project from agent pool");
        Ok(())
    }

    /// Whether the pool currently lists `project_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown pool.
    pub async fn contains_project(
        &self,
        pool: PoolId,
        project_id: &str,
    ) -> Result<bool, PoolError> {
        Ok(self.get_by_id(pool).await?.contains_project(project_id))
    }
}

fn require_project_id(project_id: &str) -> Result<(), PoolError> {
    if project_id.is_empty() {
        return Err(PoolError::InvalidArgument(
            "project id must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Mutex;

    use teamcity_common::{AgentPoolList, DEFAULT_POOL_NAME, DeletablePoolId, Projects};

    use super::*;

    /// Records every call and answers from canned data.
    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<String>>,
        created_id: i32,
        for_project: Vec<AgentPoolReference>,
        reported_count: usize,
        listing: Vec<AgentPoolReference>,
    }

    impl RecordingTransport {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn reference(id: i32, name: &str) -> AgentPoolReference {
        AgentPoolReference {
            id: PoolId(id),
            name: name.to_string(),
            href: None,
        }
    }

    impl AgentPoolTransport for RecordingTransport {
        async fn create_pool(&self, request: &CreateAgentPool) -> Result<AgentPool, PoolError> {
            self.record(format!("create {}", request.name));
            Ok(AgentPool {
                id: PoolId(self.created_id),
                name: request.name.clone(),
                max_agents: request.max_agents,
                projects: Projects::default(),
                href: None,
            })
        }
        async fn pool_by_id(&self, id: PoolId) -> Result<AgentPool, PoolError> {
            self.record(format!("get {id}"));
            Err(PoolError::pool_not_found(id))
        }
        async fn pool_by_name(&self, name: &str) -> Result<AgentPool, PoolError> {
            self.record(format!("get_by_name {name}"));
            Err(PoolError::pool_not_found(name))
        }
        async fn delete_pool(&self, id: DeletablePoolId) -> Result<(), PoolError> {
            self.record(format!("delete {}", id.get()));
            Ok(())
        }
        async fn list_pools(&self) -> Result<AgentPoolList, PoolError> {
            self.record("list".to_string());
            Ok(AgentPoolList::from(self.listing.clone()))
        }
        async fn pools_for_project(
            &self,
            project_id: &str,
        ) -> Result<ProjectAgentPools, PoolError> {
            self.record(format!("for_project {project_id}"));
            Ok(ProjectAgentPools {
                count: self.reported_count,
                agent_pools: self.for_project.clone(),
            })
        }
        async fn assign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
            self.record(format!("assign {pool} {project_id}"));
            Ok(())
        }
        async fn unassign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
            self.record(format!("unassign {pool} {project_id}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn delete_default_never_reaches_transport() {
        let pools = AgentPools::new(RecordingTransport::default());
        let err = pools.delete(PoolId::DEFAULT).await.unwrap_err();
        assert!(matches!(err, PoolError::InvalidOperation(_)));
        assert!(pools.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn delete_other_pool_is_forwarded() {
        let pools = AgentPools::new(RecordingTransport::default());
        pools.delete(PoolId(5)).await.unwrap();
        assert_eq!(pools.transport().calls(), ["delete 5"]);
    }

    #[tokio::test]
    async fn blank_pool_name_is_rejected_locally() {
        let pools = AgentPools::new(RecordingTransport::default());
        let err = pools.create(CreateAgentPool::new("  ")).await.unwrap_err();
        assert!(matches!(err, PoolError::InvalidArgument(_)));
        assert!(pools.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn created_pool_with_reserved_id_is_an_error() {
        let pools = AgentPools::new(RecordingTransport::default());
        let err = pools.create(CreateAgentPool::new("x")).await.unwrap_err();
        assert!(matches!(err, PoolError::Transport(_)));
    }

    #[tokio::test]
    async fn created_pool_is_returned() {
        let pools = AgentPools::new(RecordingTransport {
            created_id: 9,
            ..Default::default()
        });
        let pool = pools
            .create(CreateAgentPool::new("gpu").with_max_agents(3))
            .await
            .unwrap();
        assert_eq!(pool.id, PoolId(9));
        assert_eq!(pool.max_agents, Some(3));
    }

    #[tokio::test]
    async fn listing_count_is_recomputed() {
        let pools = AgentPools::new(RecordingTransport {
            for_project: vec![reference(0, DEFAULT_POOL_NAME), reference(4, "linux")],
            reported_count: 17,
            ..Default::default()
        });
        let listed = pools.list_for_project("Proj").await.unwrap();
        assert_eq!(listed.count, 2);
        assert_eq!(listed.count, listed.agent_pools.len());
    }

    #[tokio::test]
    async fn listing_without_default_is_an_error() {
        let pools = AgentPools::new(RecordingTransport {
            listing: vec![reference(2, "orphan")],
            ..Default::default()
        });
        assert!(matches!(pools.list().await, Err(PoolError::Transport(_))));

        let pools = AgentPools::new(RecordingTransport {
            listing: vec![reference(0, DEFAULT_POOL_NAME), reference(2, "other")],
            ..Default::default()
        });
        assert_eq!(pools.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_project_id_is_rejected_locally() {
        let pools = AgentPools::new(RecordingTransport::default());
        assert!(matches!(
            pools.assign_project(PoolId(1), "").await,
            Err(PoolError::InvalidArgument(_))
        ));
        assert!(matches!(
            pools.unassign_project(PoolId(1), "").await,
            Err(PoolError::InvalidArgument(_))
        ));
        assert!(matches!(
            pools.list_for_project("").await,
            Err(PoolError::InvalidArgument(_))
        ));
        assert!(pools.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn lookups_surface_not_found() {
        let pools = AgentPools::new(RecordingTransport::default());
        assert!(pools.get_by_id(PoolId(3)).await.unwrap_err().is_not_found());
        assert!(pools.get_by_name("nope").await.unwrap_err().is_not_found());
        assert_eq!(pools.transport().calls(), ["get 3", "get_by_name nope"]);
    }
}
