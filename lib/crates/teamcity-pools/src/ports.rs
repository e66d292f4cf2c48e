//! Port trait for the transport collaborator.
//!
//! Implementations own persistence, HTTP plumbing, authentication and any
//! retry policy. They translate server responses into [`PoolError`] kinds:
//! 404 into `NotFound`, a duplicate name into `Conflict`, anything else into
//! `Transport`.

use teamcity_common::{
    AgentPool, AgentPoolList, CreateAgentPool, DeletablePoolId, PoolError, PoolId,
    ProjectAgentPools,
};

/// Remote agent pool operations.
///
/// `assign_project` and `unassign_project` must be idempotent: a request
/// whose post-condition already holds succeeds without error.
#[allow(async_fn_in_trait)]
pub trait AgentPoolTransport {
    /// Create a pool and return it with its server-assigned id.
    async fn create_pool(&self, request: &CreateAgentPool) -> Result<AgentPool, PoolError>;
    /// Fetch a pool, including its project set.
    async fn pool_by_id(&self, id: PoolId) -> Result<AgentPool, PoolError>;
    /// Fetch a pool by exact name.
    async fn pool_by_name(&self, name: &str) -> Result<AgentPool, PoolError>;
    /// Delete a pool. The Default pool cannot be expressed here.
    async fn delete_pool(&self, id: DeletablePoolId) -> Result<(), PoolError>;
    /// Summaries of every pool, Default included.
    async fn list_pools(&self) -> Result<AgentPoolList, PoolError>;
    /// Every pool whose project set contains `project_id`.
    async fn pools_for_project(&self, project_id: &str) -> Result<ProjectAgentPools, PoolError>;
    /// Add `project_id` to the pool's project set.
    async fn assign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError>;
    /// Remove `project_id` from the pool's project set if present.
    async fn unassign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError>;
}

impl<T: AgentPoolTransport> AgentPoolTransport for &T {
    async fn create_pool(&self, request: &CreateAgentPool) -> Result<AgentPool, PoolError> {
        (**self).create_pool(request).await
    }
    async fn pool_by_id(&self, id: PoolId) -> Result<AgentPool, PoolError> {
        (**self).pool_by_id(id).await
    }
    async fn pool_by_name(&self, name: &str) -> Result<AgentPool, PoolError> {
        (**self).pool_by_name(name).await
    }
    async fn delete_pool(&self, id: DeletablePoolId) -> Result<(), PoolError> {
        (**self).delete_pool(id).await
    }
    async fn list_pools(&self) -> Result<AgentPoolList, PoolError> {
        (**self).list_pools().await
    }
    async fn pools_for_project(&self, project_id: &str) -> Result<ProjectAgentPools, PoolError> {
        (**self).pools_for_project(project_id).await
    }
    async fn assign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
        (**self).assign_project(pool, project_id).await
    }
    async fn unassign_project(&self, pool: PoolId, project_id: &str) -> Result<(), PoolError> {
        (**self).unassign_project(pool, project_id).await
    }
}
