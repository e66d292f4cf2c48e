pub mod agent_pool;
pub mod config;
pub mod error;
pub mod parameter;
pub mod parameters;

pub use agent_pool::{
    AgentPool, AgentPoolList, AgentPoolReference, CreateAgentPool, DEFAULT_POOL_NAME,
    DeletablePoolId, PoolId, ProjectAgentPools, ProjectRef, Projects,
};
pub use config::ClientConfig;
pub use error::{ParameterError, PoolError};
pub use parameter::{Parameter, ParameterKind, Property, decode, encode};
pub use parameters::ParameterCollection;
