//! Task board: posting, claiming and resolving tasks in a chat channel.
//!
//! Authorised members post tasks, members holding the claimer role take them,
//! and the claimant marks them resolved. Every transition yields notification
//! intents that the hosting chat layer renders and delivers. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
