//! Task aggregate root and lifecycle state machine.

use super::{
    Capability, CapabilitySet, MemberId, Price, TaskDescription, TaskDomainError, TaskId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
///
/// The only path through the lifecycle is `Open → Claimed → Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task is posted and waiting for someone to take it.
    Open,
    /// A member has taken responsibility for the task.
    Claimed,
    /// The claimant has marked the task as done.
    Resolved,
}

impl TaskState {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Claimed => "claimed",
            Self::Resolved => "resolved",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Claimed) | (Self::Claimed, Self::Resolved)
        )
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    description: TaskDescription,
    price: Option<Price>,
    creator: MemberId,
    claimant: Option<MemberId>,
    state: TaskState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new open task.
    ///
    /// The description is validated before the creator's capability, so an
    /// empty description is reported as such whatever roles the creator has.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the description is
    /// blank, or [`TaskDomainError::MissingCapability`] when `capabilities`
    /// lacks [`Capability::CreateTask`].
    pub fn create(
        description: impl Into<String>,
        price: Option<String>,
        creator: MemberId,
        capabilities: CapabilitySet,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let validated = TaskDescription::new(description)?;
        require(capabilities, Capability::CreateTask, creator)?;

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            description: validated,
            price: Price::parse(price),
            creator,
            claimant: None,
            state: TaskState::Open,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the price annotation, if any.
    #[must_use]
    pub const fn price(&self) -> Option<&Price> {
        self.price.as_ref()
    }

    /// Returns the member who posted the task.
    #[must_use]
    pub const fn creator(&self) -> MemberId {
        self.creator
    }

    /// Returns the member holding the claim, if any.
    #[must_use]
    pub const fn claimant(&self) -> Option<MemberId> {
        self.claimant
    }

    /// Returns the task lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Claims an open task for `actor`.
    ///
    /// The state is checked before the capability: a task that is already
    /// claimed or resolved reports an invalid transition to everyone.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the task is
    /// not open, or [`TaskDomainError::MissingCapability`] when the actor
    /// lacks [`Capability::ClaimTask`]. The task is unchanged on error.
    pub fn claim(
        &mut self,
        actor: MemberId,
        capabilities: CapabilitySet,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskState::Claimed)?;
        require(capabilities, Capability::ClaimTask, actor)?;

        self.claimant = Some(actor);
        self.apply(TaskState::Claimed, clock);
        Ok(())
    }

    /// Resolves a claimed task on behalf of its claimant.
    ///
    /// Holding the claimer role is not enough: `actor` must be the member
    /// recorded as claimant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the task is
    /// not claimed, or [`TaskDomainError::NotClaimant`] when `actor` is not
    /// the claimant. The task is unchanged on error.
    pub fn resolve(&mut self, actor: MemberId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskState::Resolved)?;
        if self.claimant != Some(actor) {
            return Err(TaskDomainError::NotClaimant {
                task_id: self.id,
                actor,
            });
        }

        self.apply(TaskState::Resolved, clock);
        Ok(())
    }

    fn ensure_transition(&self, target: TaskState) -> Result<(), TaskDomainError> {
        if self.state.can_transition_to(target) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.state,
                to: target,
            })
        }
    }

    fn apply(&mut self, target: TaskState, clock: &impl Clock) {
        self.state = target;
        self.updated_at = clock.utc();
    }
}

fn require(
    capabilities: CapabilitySet,
    capability: Capability,
    actor: MemberId,
) -> Result<(), TaskDomainError> {
    if capabilities.contains(capability) {
        Ok(())
    } else {
        Err(TaskDomainError::MissingCapability { actor, capability })
    }
}
