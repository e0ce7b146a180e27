//! Taskboard: a chat-channel task board.
//!
//! Authorised members post tasks to a shared channel, members holding the
//! claimer role take them, and the claimant marks them resolved. This crate
//! holds the lifecycle state machine, its permission rules, and the
//! notification contract; the chat-platform gateway is an external
//! collaborator that feeds actions in and delivers the resulting intents.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, console, etc.)
//!
//! # Modules
//!
//! - [`board`]: Task lifecycle, capabilities and notifications
//! - [`config`]: Layered runtime configuration
//! - [`telemetry`]: Structured logging setup

pub mod board;
pub mod config;
pub mod telemetry;
