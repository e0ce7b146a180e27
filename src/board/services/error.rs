//! Service-level errors and their classification.

use thiserror::Error;

use crate::board::{
    domain::{Capability, DenialReason, TaskDomainError, TaskId, TaskState},
    ports::TaskRepositoryError,
};

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// Domain validation or a lifecycle guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Result type for board service operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;

/// Coarse classification of a failed action.
///
/// Delivery failures are not listed: they never fail an action and are
/// reported through the delivery report instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The actor lacks the capability or identity the action requires.
    PermissionDenied,
    /// The action carried malformed input.
    InvalidArgument,
    /// The task is not in a state that permits the action.
    InvalidState,
    /// Infrastructure failure unrelated to the actor's input.
    Internal,
}

impl FailureKind {
    /// Returns the canonical name of the failure kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidState => "invalid_state",
            Self::Internal => "internal",
        }
    }
}

impl TaskBoardError {
    /// Classifies the error.
    ///
    /// Stale references to unknown tasks count as invalid state.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(TaskDomainError::EmptyDescription) => FailureKind::InvalidArgument,
            Self::Domain(
                TaskDomainError::MissingCapability { .. } | TaskDomainError::NotClaimant { .. },
            ) => FailureKind::PermissionDenied,
            Self::Domain(TaskDomainError::InvalidStateTransition { .. })
            | Self::TaskNotFound(_)
            | Self::Repository(
                TaskRepositoryError::NotFound(_) | TaskRepositoryError::StateConflict { .. },
            ) => FailureKind::InvalidState,
            Self::Repository(
                TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::Persistence(_),
            ) => FailureKind::Internal,
        }
    }

    /// Returns the reason shown to the actor when the action is refused.
    #[must_use]
    pub const fn denial_reason(&self) -> DenialReason {
        match self {
            Self::Domain(TaskDomainError::EmptyDescription) => DenialReason::EmptyDescription,
            Self::Domain(TaskDomainError::MissingCapability { capability, .. }) => {
                match capability {
                    Capability::CreateTask => DenialReason::NotPermittedToCreate,
                    Capability::ClaimTask => DenialReason::NotPermittedToClaim,
                }
            }
            Self::Domain(TaskDomainError::NotClaimant { .. }) => DenialReason::NotClaimant,
            Self::Domain(TaskDomainError::InvalidStateTransition { from, .. })
            | Self::Repository(TaskRepositoryError::StateConflict { actual: from, .. }) => {
                match from {
                    TaskState::Open => DenialReason::NotClaimed,
                    TaskState::Claimed => DenialReason::AlreadyClaimed,
                    TaskState::Resolved => DenialReason::AlreadyResolved,
                }
            }
            Self::TaskNotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                DenialReason::UnknownTask
            }
            Self::Repository(
                TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::Persistence(_),
            ) => DenialReason::Internal,
        }
    }
}
