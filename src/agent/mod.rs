//! Specialist agents and the dispatcher that fans a question out to them.
//!
//! The set of agents is closed ([`AgentId`]). Each agent is one HTTP service
//! exposing `POST /answer`; the [`AgentDispatcher`] calls the selected ones
//! concurrently and always returns one entry per requested agent.

pub mod dispatcher;
pub mod specialist;
pub mod types;

pub use dispatcher::{AgentDispatcher, AgentResponses};
pub use specialist::SpecialistAgent;
pub use types::{AgentId, AgentResponse};
