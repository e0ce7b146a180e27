//! Error types for task domain validation and transitions.

use super::{Capability, MemberId, TaskId, TaskState};
use thiserror::Error;

/// Errors returned by task construction and lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The actor does not hold the capability the action requires.
    #[error("member {actor} lacks the {} capability", capability.as_str())]
    MissingCapability {
        /// Member that attempted the action.
        actor: MemberId,
        /// Capability the action requires.
        capability: Capability,
    },

    /// Only the member holding the claim may resolve the task.
    #[error("member {actor} is not the claimant of task {task_id}")]
    NotClaimant {
        /// Task the actor tried to resolve.
        task_id: TaskId,
        /// Member that attempted the resolve.
        actor: MemberId,
    },

    /// The requested transition is not permitted from the current state.
    #[error(
        "invalid state transition for task {task_id} from {} to {}",
        from.as_str(),
        to.as_str()
    )]
    InvalidStateTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// State the task was in.
        from: TaskState,
        /// State the action tried to reach.
        to: TaskState,
    },
}

