//! Recording notification sink.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::board::{
    domain::{DeliveryKind, NotificationIntent},
    ports::{DeliveryError, NotificationSink},
};

/// Sink that keeps delivered intents in memory.
///
/// Failures can be scripted per delivery kind, either permanently or for a
/// fixed number of attempts.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSink {
    state: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    delivered: Vec<NotificationIntent>,
    attempts: usize,
    failing: HashMap<DeliveryKind, FailureScript>,
}

#[derive(Debug, Clone, Copy)]
enum FailureScript {
    Always,
    Times(usize),
}

impl RecordingNotificationSink {
    /// Creates a sink that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every delivery of `kind` fail.
    #[must_use]
    pub fn failing(self, kind: DeliveryKind) -> Self {
        self.script(kind, FailureScript::Always)
    }

    /// Makes the next `times` deliveries of `kind` fail.
    #[must_use]
    pub fn failing_times(self, kind: DeliveryKind, times: usize) -> Self {
        self.script(kind, FailureScript::Times(times))
    }

    fn script(self, kind: DeliveryKind, script: FailureScript) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(kind, script);
        }
        self
    }

    /// Returns the intents delivered successfully, in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<NotificationIntent> {
        self.state
            .lock()
            .map(|state| state.delivered.clone())
            .unwrap_or_default()
    }

    /// Returns how many delivery attempts were made, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.state.lock().map(|state| state.attempts).unwrap_or(0)
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn deliver(&self, intent: &NotificationIntent) -> Result<(), DeliveryError> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| DeliveryError::transport(std::io::Error::other(err.to_string())))?;
        state.attempts += 1;

        let kind = intent.kind();
        let should_fail = match state.failing.get(&kind).copied() {
            Some(FailureScript::Always) => true,
            Some(FailureScript::Times(remaining)) if remaining > 0 => {
                state.failing.insert(kind, FailureScript::Times(remaining - 1));
                true
            }
            Some(FailureScript::Times(_)) | None => false,
        };

        if should_fail {
            return Err(intent.recipient().map_or(
                DeliveryError::MissingDestination(kind),
                DeliveryError::Unreachable,
            ));
        }

        state.delivered.push(intent.clone());
        Ok(())
    }
}
