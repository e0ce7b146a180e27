//! Entry point for inbound board actions.
//!
//! [`TaskBoard`] runs an action in two phases. The lifecycle transition is
//! committed first and is authoritative; notification planning and delivery
//! follow and never change the stored task. A new task's card is posted
//! before the creator is acknowledged, and a creator whose card never reached
//! the open feed is told the action failed instead.

use mockable::Clock;

use crate::board::{
    domain::{DeliveryKind, MemberId, NotificationIntent, Task},
    ports::{NotificationSink, TaskRepository},
};

use super::{
    delivery::{DeliveryReport, NotificationDelivery},
    dispatcher::{NotificationDispatcher, Transition},
    error::{FailureKind, TaskBoardError, TaskBoardResult},
    lifecycle::{ClaimTaskRequest, CreateTaskRequest, ResolveTaskRequest, TaskLifecycleService},
};

/// Inbound action from the hosting chat layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    /// Post a new task.
    Create(CreateTaskRequest),
    /// Claim an open task.
    Claim(ClaimTaskRequest),
    /// Resolve a claimed task.
    Resolve(ResolveTaskRequest),
}

impl BoardAction {
    /// Returns the member performing the action.
    #[must_use]
    pub const fn actor(&self) -> MemberId {
        match self {
            Self::Create(request) => request.creator(),
            Self::Claim(request) => request.actor(),
            Self::Resolve(request) => request.actor(),
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Claim(_) => "claim",
            Self::Resolve(_) => "resolve",
        }
    }
}

/// Result of handling one action.
#[derive(Debug)]
pub struct ActionReport {
    outcome: TaskBoardResult<Task>,
    intents: Vec<NotificationIntent>,
    delivery: DeliveryReport,
}

impl ActionReport {
    /// Returns the task after the transition, or why the action was refused.
    #[must_use]
    pub const fn outcome(&self) -> &TaskBoardResult<Task> {
        &self.outcome
    }

    /// Returns the planned intents in plan order.
    #[must_use]
    pub fn intents(&self) -> &[NotificationIntent] {
        &self.intents
    }

    /// Returns the delivery outcome.
    #[must_use]
    pub const fn delivery(&self) -> &DeliveryReport {
        &self.delivery
    }

    /// Consumes the report, returning the outcome.
    ///
    /// # Errors
    ///
    /// Returns the [`TaskBoardError`] that refused the action.
    pub fn into_outcome(self) -> TaskBoardResult<Task> {
        self.outcome
    }
}

/// Task board combining lifecycle, dispatch and delivery.
#[derive(Clone)]
pub struct TaskBoard<R, C, S>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
    S: NotificationSink,
{
    lifecycle: TaskLifecycleService<R, C>,
    delivery: NotificationDelivery<S>,
}

impl<R, C, S> TaskBoard<R, C, S>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
    S: NotificationSink,
{
    /// Creates a board from its services.
    #[must_use]
    pub const fn new(
        lifecycle: TaskLifecycleService<R, C>,
        delivery: NotificationDelivery<S>,
    ) -> Self {
        Self {
            lifecycle,
            delivery,
        }
    }

    /// Returns the lifecycle service, e.g. for read-only lookups.
    #[must_use]
    pub const fn lifecycle(&self) -> &TaskLifecycleService<R, C> {
        &self.lifecycle
    }

    /// Handles an action end to end.
    ///
    /// Refused actions produce exactly one ephemeral denial to the actor and
    /// leave task state untouched.
    pub async fn handle(&self, action: BoardAction) -> ActionReport {
        let actor = action.actor();
        let action_name = action.name();

        let transition = self.apply(action).await;
        let (intents, delivery) = match &transition {
            Ok(created @ Transition::Created { .. }) => self.announce(created).await,
            Ok(committed) => {
                let intents = NotificationDispatcher::plan(committed);
                let delivery = self.delivery.deliver(&intents).await;
                (intents, delivery)
            }
            Err(error) => {
                log_refusal(action_name, actor, error);
                let intents = NotificationDispatcher::plan_denial(actor, error);
                let delivery = self.delivery.deliver(&intents).await;
                (intents, delivery)
            }
        };

        ActionReport {
            outcome: transition.map(Transition::into_task),
            intents,
            delivery,
        }
    }

    /// Posts a new task's card, then acknowledges the creator only if the card
    /// landed.
    async fn announce(&self, created: &Transition) -> (Vec<NotificationIntent>, DeliveryReport) {
        let task = created.task();
        let (mut intents, follow_up): (Vec<_>, Vec<_>) = NotificationDispatcher::plan(created)
            .into_iter()
            .partition(|intent| intent.kind() == DeliveryKind::PublicOpenFeedPost);

        let posted = self.delivery.deliver(&intents).await;
        let follow_up = if posted.is_complete() {
            follow_up
        } else {
            tracing::error!(
                task_id = %task.id(),
                creator = %task.creator(),
                "task card was not posted; telling the creator"
            );
            NotificationDispatcher::plan_unposted(task)
        };

        let replied = self.delivery.deliver(&follow_up).await;
        intents.extend(follow_up);
        (intents, posted.merge(replied))
    }

    async fn apply(&self, action: BoardAction) -> TaskBoardResult<Transition> {
        match action {
            BoardAction::Create(request) => {
                let task = self.lifecycle.create_task(request).await?;
                Ok(Transition::Created { task })
            }
            BoardAction::Claim(request) => {
                let task = self.lifecycle.claim_task(request).await?;
                Ok(Transition::Claimed {
                    task,
                    claimant: request.actor(),
                })
            }
            BoardAction::Resolve(request) => {
                let task = self.lifecycle.resolve_task(&request).await?;
                Ok(Transition::Resolved {
                    task,
                    claimant: request.actor(),
                    claimant_name: request.actor_name().map(ToOwned::to_owned),
                })
            }
        }
    }
}

fn log_refusal(action: &str, actor: MemberId, error: &TaskBoardError) {
    let kind = error.kind();
    if kind == FailureKind::Internal {
        tracing::error!(action, %actor, kind = kind.as_str(), %error, "board action failed");
    } else {
        tracing::warn!(action, %actor, kind = kind.as_str(), %error, "board action refused");
    }
}
