//! Notification intents produced by lifecycle transitions.
//!
//! An intent names where a message should go and carries plain fields for the
//! hosting layer to render. Intents never contain platform markup.

use super::{MemberId, Task, TaskId};
use serde::{Deserialize, Serialize};

/// Destination kind of a notification intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryKind {
    /// Reply visible only to the member who triggered the action.
    EphemeralReply,
    /// New message in the public open-tasks feed.
    PublicOpenFeedPost,
    /// Edit or removal of an existing card in the open-tasks feed.
    PublicOpenFeedUpdate,
    /// New record in the public resolved-tasks feed.
    PublicResolvedFeedPost,
    /// Direct message to a single member.
    DirectMessage,
}

impl DeliveryKind {
    /// Returns the canonical kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EphemeralReply => "ephemeral-reply",
            Self::PublicOpenFeedPost => "public-open-feed-post",
            Self::PublicOpenFeedUpdate => "public-open-feed-update",
            Self::PublicResolvedFeedPost => "public-resolved-feed-post",
            Self::DirectMessage => "direct-message",
        }
    }

    /// Returns whether delivery is attempted at most once and failures are
    /// swallowed.
    #[must_use]
    pub const fn is_best_effort(self) -> bool {
        matches!(self, Self::DirectMessage)
    }

    /// Returns whether the delivery targets a public feed and must be
    /// retried until it lands or attempts run out.
    #[must_use]
    pub const fn is_public_feed(self) -> bool {
        matches!(
            self,
            Self::PublicOpenFeedPost | Self::PublicOpenFeedUpdate | Self::PublicResolvedFeedPost
        )
    }
}

/// Acknowledgement sent back to the acting member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgement {
    /// The task was posted.
    TaskCreated,
    /// The task was marked as resolved.
    TaskResolved,
}

/// Reason an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The actor holds none of the creator roles.
    NotPermittedToCreate,
    /// The actor does not hold the claimer role.
    NotPermittedToClaim,
    /// The actor tried to resolve a task claimed by someone else.
    NotClaimant,
    /// The task description was blank.
    EmptyDescription,
    /// Someone else claimed the task first.
    AlreadyClaimed,
    /// The task has not been claimed yet.
    NotClaimed,
    /// The task is already resolved.
    AlreadyResolved,
    /// The referenced task does not exist.
    UnknownTask,
    /// The board failed internally; the action may be retried later.
    Internal,
}

/// Plain-field payload of a notification intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Public card for a newly posted task.
    TaskCard {
        /// Task the card represents.
        task_id: TaskId,
        /// Task description.
        description: String,
        /// Price annotation, if any.
        price: Option<String>,
        /// Member who posted the task.
        creator: MemberId,
    },
    /// Public card updated to show who took the task.
    ClaimedCard {
        /// Task the card represents.
        task_id: TaskId,
        /// Task description.
        description: String,
        /// Member who claimed the task.
        claimant: MemberId,
    },
    /// Removal of the task's public card.
    CardRemoved {
        /// Task whose card is removed.
        task_id: TaskId,
    },
    /// Append-only record in the resolved-tasks feed.
    ResolutionRecord {
        /// Resolved task.
        task_id: TaskId,
        /// Task description.
        description: String,
        /// Member who resolved the task.
        claimant: MemberId,
        /// Member who posted the task.
        creator: MemberId,
    },
    /// Notice to the creator that their task was resolved.
    ResolutionNotice {
        /// Resolved task.
        task_id: TaskId,
        /// Task description.
        description: String,
        /// Member who resolved the task.
        claimant: MemberId,
        /// Display name of the claimant, when the hosting layer supplied one.
        claimant_name: Option<String>,
    },
    /// Confirmation of a successful action.
    Acknowledgement {
        /// What is being acknowledged.
        acknowledgement: Acknowledgement,
    },
    /// Refusal of an action.
    Denial {
        /// Why the action was refused.
        reason: DenialReason,
    },
}

impl NotificationPayload {
    /// Builds the public card for an open task.
    #[must_use]
    pub fn task_card(task: &Task) -> Self {
        Self::TaskCard {
            task_id: task.id(),
            description: task.description().as_str().to_owned(),
            price: task.price().map(|price| price.as_str().to_owned()),
            creator: task.creator(),
        }
    }
}

/// Description of a message to deliver, decoupled from how it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    kind: DeliveryKind,
    recipient: Option<MemberId>,
    payload: NotificationPayload,
}

impl NotificationIntent {
    /// Reply visible only to `recipient`.
    #[must_use]
    pub const fn ephemeral(recipient: MemberId, payload: NotificationPayload) -> Self {
        Self {
            kind: DeliveryKind::EphemeralReply,
            recipient: Some(recipient),
            payload,
        }
    }

    /// New post in the open-tasks feed.
    #[must_use]
    pub const fn open_feed_post(payload: NotificationPayload) -> Self {
        Self {
            kind: DeliveryKind::PublicOpenFeedPost,
            recipient: None,
            payload,
        }
    }

    /// Update of an existing open-tasks card.
    #[must_use]
    pub const fn open_feed_update(payload: NotificationPayload) -> Self {
        Self {
            kind: DeliveryKind::PublicOpenFeedUpdate,
            recipient: None,
            payload,
        }
    }

    /// New record in the resolved-tasks feed.
    #[must_use]
    pub const fn resolved_feed_post(payload: NotificationPayload) -> Self {
        Self {
            kind: DeliveryKind::PublicResolvedFeedPost,
            recipient: None,
            payload,
        }
    }

    /// Direct message to `recipient`.
    #[must_use]
    pub const fn direct_message(recipient: MemberId, payload: NotificationPayload) -> Self {
        Self {
            kind: DeliveryKind::DirectMessage,
            recipient: Some(recipient),
            payload,
        }
    }

    /// Returns the destination kind.
    #[must_use]
    pub const fn kind(&self) -> DeliveryKind {
        self.kind
    }

    /// Returns the addressed member for ephemeral replies and direct
    /// messages.
    #[must_use]
    pub const fn recipient(&self) -> Option<MemberId> {
        self.recipient
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &NotificationPayload {
        &self.payload
    }
}
