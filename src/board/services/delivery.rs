//! Delivery of planned notification intents.
//!
//! Public feed intents are retried until they land or the attempt budget is
//! spent, and every attempt is bounded by the attempt timeout. Direct messages
//! get one attempt bounded by a timeout and run alongside the other
//! deliveries, so an unresponsive recipient cannot hold up the feed posts or
//! the actor's acknowledgement. Delivery never touches task state.

use std::sync::Arc;
use std::time::Duration;

use crate::board::{
    domain::{DeliveryKind, MemberId, NotificationIntent},
    ports::{DeliveryError, NotificationSink},
};

/// Default time allowed for a direct message.
pub const DEFAULT_DIRECT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of attempts for public feed deliveries.
pub const DEFAULT_FEED_ATTEMPTS: u32 = 3;

/// Default time allowed for a single public feed or reply attempt.
pub const DEFAULT_FEED_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeouts and retry budget for deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    direct_message_timeout: Duration,
    feed_attempts: u32,
    attempt_timeout: Duration,
}

impl DeliveryPolicy {
    /// Creates a policy. An attempt budget of zero is raised to one.
    #[must_use]
    pub fn new(direct_message_timeout: Duration, feed_attempts: u32) -> Self {
        Self {
            direct_message_timeout,
            feed_attempts: feed_attempts.max(1),
            attempt_timeout: DEFAULT_FEED_ATTEMPT_TIMEOUT,
        }
    }

    /// Sets the time allowed for each attempt of a non-direct delivery.
    #[must_use]
    pub const fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Returns the time allowed for a direct message.
    #[must_use]
    pub const fn direct_message_timeout(&self) -> Duration {
        self.direct_message_timeout
    }

    /// Returns the attempt budget for public feed deliveries.
    #[must_use]
    pub const fn feed_attempts(&self) -> u32 {
        self.feed_attempts
    }

    /// Returns the time allowed for each attempt of a non-direct delivery.
    #[must_use]
    pub const fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    const fn attempts_for(&self, kind: DeliveryKind) -> u32 {
        if kind.is_public_feed() {
            self.feed_attempts
        } else {
            1
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECT_MESSAGE_TIMEOUT, DEFAULT_FEED_ATTEMPTS)
    }
}

/// A delivery that did not succeed.
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    kind: DeliveryKind,
    recipient: Option<MemberId>,
    attempts: u32,
    error: DeliveryError,
}

impl DeliveryFailure {
    /// Returns the destination kind of the failed intent.
    #[must_use]
    pub const fn kind(&self) -> DeliveryKind {
        self.kind
    }

    /// Returns the addressed member, if any.
    #[must_use]
    pub const fn recipient(&self) -> Option<MemberId> {
        self.recipient
    }

    /// Returns how many attempts were made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the last error.
    #[must_use]
    pub const fn error(&self) -> &DeliveryError {
        &self.error
    }
}

/// Outcome of delivering a set of intents.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    delivered: Vec<DeliveryKind>,
    failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    /// Returns the kinds of the intents that were delivered.
    #[must_use]
    pub fn delivered(&self) -> &[DeliveryKind] {
        &self.delivered
    }

    /// Returns the deliveries that failed.
    #[must_use]
    pub fn failures(&self) -> &[DeliveryFailure] {
        &self.failures
    }

    /// Returns whether every intent was delivered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub(super) fn merge(mut self, other: Self) -> Self {
        self.delivered.extend(other.delivered);
        self.failures.extend(other.failures);
        self
    }
}

/// Delivers intents through a [`NotificationSink`].
#[derive(Clone)]
pub struct NotificationDelivery<S>
where
    S: NotificationSink,
{
    sink: Arc<S>,
    policy: DeliveryPolicy,
}

impl<S> NotificationDelivery<S>
where
    S: NotificationSink,
{
    /// Creates a delivery service.
    #[must_use]
    pub const fn new(sink: Arc<S>, policy: DeliveryPolicy) -> Self {
        Self { sink, policy }
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Delivers `intents` and reports the outcome.
    ///
    /// Intents other than direct messages are delivered in plan order.
    pub async fn deliver(&self, intents: &[NotificationIntent]) -> DeliveryReport {
        let (best_effort, ordered): (Vec<&NotificationIntent>, Vec<&NotificationIntent>) = intents
            .iter()
            .partition(|intent| intent.kind().is_best_effort());

        let (ordered_report, best_effort_report) = tokio::join!(
            self.deliver_ordered(&ordered),
            self.deliver_best_effort(&best_effort)
        );
        ordered_report.merge(best_effort_report)
    }

    async fn deliver_ordered(&self, intents: &[&NotificationIntent]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for intent in intents {
            let budget = self.policy.attempts_for(intent.kind());
            match self.deliver_with_retry(intent, budget).await {
                Ok(()) => report.delivered.push(intent.kind()),
                Err((attempts, error)) => {
                    tracing::error!(
                        kind = intent.kind().as_str(),
                        attempts,
                        error = %error,
                        "notification delivery failed"
                    );
                    report.failures.push(failure(intent, attempts, error));
                }
            }
        }
        report
    }

    async fn deliver_with_retry(
        &self,
        intent: &NotificationIntent,
        budget: u32,
    ) -> Result<(), (u32, DeliveryError)> {
        let timeout = self.policy.attempt_timeout;
        let mut attempt = 1;
        loop {
            let outcome = tokio::time::timeout(timeout, self.sink.deliver(intent))
                .await
                .unwrap_or_else(|_elapsed| {
                    Err(DeliveryError::TimedOut {
                        kind: intent.kind(),
                        timeout,
                    })
                });
            match outcome {
                Ok(()) => return Ok(()),
                Err(error) if attempt < budget => {
                    tracing::debug!(
                        kind = intent.kind().as_str(),
                        attempt,
                        error = %error,
                        "retrying notification delivery"
                    );
                    attempt += 1;
                }
                Err(error) => return Err((attempt, error)),
            }
        }
    }

    async fn deliver_best_effort(&self, intents: &[&NotificationIntent]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let timeout = self.policy.direct_message_timeout;
        for intent in intents {
            let outcome = tokio::time::timeout(timeout, self.sink.deliver(intent))
                .await
                .unwrap_or_else(|_elapsed| {
                    Err(DeliveryError::TimedOut {
                        kind: intent.kind(),
                        timeout,
                    })
                });
            match outcome {
                Ok(()) => report.delivered.push(intent.kind()),
                Err(error) => {
                    tracing::warn!(
                        kind = intent.kind().as_str(),
                        recipient = ?intent.recipient(),
                        error = %error,
                        "best-effort notification dropped"
                    );
                    report.failures.push(failure(intent, 1, error));
                }
            }
        }
        report
    }
}

fn failure(intent: &NotificationIntent, attempts: u32, error: DeliveryError) -> DeliveryFailure {
    DeliveryFailure {
        kind: intent.kind(),
        recipient: intent.recipient(),
        attempts,
        error,
    }
}
