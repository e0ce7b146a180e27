//! Outbound port for delivering notification intents.

use crate::board::domain::{DeliveryKind, MemberId, NotificationIntent};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Delivers rendered notifications through the hosting chat platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers a single intent.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the platform refuses or cannot complete
    /// the delivery.
    async fn deliver(&self, intent: &NotificationIntent) -> Result<(), DeliveryError>;
}

/// Errors raised while delivering a notification.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The addressed member cannot be reached, e.g. direct messages are
    /// disabled.
    #[error("member {0} is unreachable")]
    Unreachable(MemberId),

    /// The destination is not configured or no longer exists.
    #[error("no destination available for {}", .0.as_str())]
    MissingDestination(DeliveryKind),

    /// Delivery did not finish within the allotted time.
    #[error("{} delivery timed out after {timeout:?}", kind.as_str())]
    TimedOut {
        /// Kind of delivery that timed out.
        kind: DeliveryKind,
        /// Time allowed for the attempt.
        timeout: Duration,
    },

    /// The payload could not be turned into a platform message.
    #[error("failed to render notification: {0}")]
    Render(String),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl DeliveryError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
