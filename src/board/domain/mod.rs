//! Domain model for the task board.
//!
//! The domain covers the task lifecycle state machine, the role-derived
//! capability rules that guard each transition, and the notification intents
//! emitted for the hosting chat layer. Rendering and delivery stay outside the
//! domain boundary.

mod capability;
mod error;
mod ids;
mod notification;
mod task;
mod text;

pub use capability::{Capability, CapabilitySet, RolePolicy};
pub use error::TaskDomainError;
pub use ids::{MemberId, TaskId};
pub use notification::{
    Acknowledgement, DeliveryKind, DenialReason, NotificationIntent, NotificationPayload,
};
pub use task::{Task, TaskState};
pub use text::{Price, TaskDescription};
