//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod notifier;
pub mod repository;

pub use notifier::{DeliveryError, NotificationSink};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
