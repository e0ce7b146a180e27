//! Maps lifecycle transitions to notification intents.

use crate::board::domain::{
    Acknowledgement, DenialReason, MemberId, NotificationIntent, NotificationPayload, Task,
};

use super::error::TaskBoardError;

/// A committed lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A task was posted.
    Created {
        /// The new open task.
        task: Task,
    },
    /// A task was claimed.
    Claimed {
        /// The task after the claim.
        task: Task,
        /// Member who claimed it.
        claimant: MemberId,
    },
    /// A task was resolved.
    Resolved {
        /// The task after resolution.
        task: Task,
        /// Member who resolved it.
        claimant: MemberId,
        /// Claimant display name supplied by the hosting layer.
        claimant_name: Option<String>,
    },
}

impl Transition {
    /// Returns the task as it stands after the transition.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::Created { task } | Self::Claimed { task, .. } | Self::Resolved { task, .. } => {
                task
            }
        }
    }

    /// Consumes the transition, returning the task.
    #[must_use]
    pub fn into_task(self) -> Task {
        match self {
            Self::Created { task } | Self::Claimed { task, .. } | Self::Resolved { task, .. } => {
                task
            }
        }
    }
}

/// Derives the notifications owed for each transition outcome.
///
/// Planning is a pure function of its inputs; delivery happens elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Returns the ordered intents for a committed transition.
    #[must_use]
    pub fn plan(transition: &Transition) -> Vec<NotificationIntent> {
        match transition {
            Transition::Created { task } => vec![
                NotificationIntent::open_feed_post(NotificationPayload::task_card(task)),
                NotificationIntent::ephemeral(
                    task.creator(),
                    NotificationPayload::Acknowledgement {
                        acknowledgement: Acknowledgement::TaskCreated,
                    },
                ),
            ],
            Transition::Claimed { task, claimant } => {
                vec![NotificationIntent::open_feed_update(
                    NotificationPayload::ClaimedCard {
                        task_id: task.id(),
                        description: task.description().as_str().to_owned(),
                        claimant: *claimant,
                    },
                )]
            }
            Transition::Resolved {
                task,
                claimant,
                claimant_name,
            } => {
                let description = task.description().as_str().to_owned();
                vec![
                    NotificationIntent::resolved_feed_post(NotificationPayload::ResolutionRecord {
                        task_id: task.id(),
                        description: description.clone(),
                        claimant: *claimant,
                        creator: task.creator(),
                    }),
                    NotificationIntent::direct_message(
                        task.creator(),
                        NotificationPayload::ResolutionNotice {
                            task_id: task.id(),
                            description,
                            claimant: *claimant,
                            claimant_name: claimant_name.clone(),
                        },
                    ),
                    NotificationIntent::ephemeral(
                        *claimant,
                        NotificationPayload::Acknowledgement {
                            acknowledgement: Acknowledgement::TaskResolved,
                        },
                    ),
                    NotificationIntent::open_feed_update(NotificationPayload::CardRemoved {
                        task_id: task.id(),
                    }),
                ]
            }
        }
    }

    /// Returns the reply sent to the creator in place of the creation
    /// acknowledgement when the task card could not be posted.
    #[must_use]
    pub fn plan_unposted(task: &Task) -> Vec<NotificationIntent> {
        vec![NotificationIntent::ephemeral(
            task.creator(),
            NotificationPayload::Denial {
                reason: DenialReason::Internal,
            },
        )]
    }

    /// Returns the single ephemeral denial owed to `actor` for a refused
    /// action.
    #[must_use]
    pub fn plan_denial(actor: MemberId, error: &TaskBoardError) -> Vec<NotificationIntent> {
        vec![NotificationIntent::ephemeral(
            actor,
            NotificationPayload::Denial {
                reason: error.denial_reason(),
            },
        )]
    }
}
