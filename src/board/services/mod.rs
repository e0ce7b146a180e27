//! Application services for the task board.

mod board;
mod delivery;
mod dispatcher;
mod error;
mod lifecycle;

pub use board::{ActionReport, BoardAction, TaskBoard};
pub use delivery::{
    DEFAULT_DIRECT_MESSAGE_TIMEOUT, DEFAULT_FEED_ATTEMPT_TIMEOUT, DEFAULT_FEED_ATTEMPTS,
    DeliveryFailure, DeliveryPolicy, DeliveryReport, NotificationDelivery,
};
pub use dispatcher::{NotificationDispatcher, Transition};
pub use error::{FailureKind, TaskBoardError, TaskBoardResult};
pub use lifecycle::{ClaimTaskRequest, CreateTaskRequest, ResolveTaskRequest, TaskLifecycleService};
