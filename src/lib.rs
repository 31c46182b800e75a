//! Regulatory Oracle - query orchestration for specialist agents
//!
//! A question is classified by a router service, answered in parallel by
//! one or more specialist agents, validated (and merged when several agents
//! answered) by an auditor, and rendered into one markdown answer.
//!
//! The pipeline lives in [`pipeline`]; the HTTP surface in [`api`] and the
//! command line in [`cli`].

pub mod agent;
pub mod api;
pub mod audit;
pub mod cli;
pub mod client;
pub mod config;
pub mod format;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod routing;
