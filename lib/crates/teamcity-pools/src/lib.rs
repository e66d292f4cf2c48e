//! Agent pool / project membership for the TeamCity client.
//!
//! [`AgentPools`] is the entry point. It talks to the server only through an
//! [`AgentPoolTransport`]; [`InMemoryPoolServer`] is a transport that keeps
//! the server's membership rules in process memory.

pub mod memory;
pub mod ports;
pub mod service;

pub use memory::InMemoryPoolServer;
pub use ports::AgentPoolTransport;
pub use service::AgentPools;
