//! Text-stream notification sink used by the console harness.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use super::render::NotificationRenderer;
use crate::board::{
    domain::{DeliveryKind, MemberId, NotificationIntent},
    ports::{DeliveryError, NotificationSink},
};
use crate::config::ChannelConfig;

/// Writes rendered notifications to a text stream, one block per intent.
///
/// Each block is prefixed with a destination label such as `[#opgaver]` or
/// `[dm → 42]`. Members listed as blocked refuse direct messages, mimicking
/// members who have disabled them.
#[derive(Debug)]
pub struct ConsoleNotificationSink<W> {
    renderer: NotificationRenderer,
    channels: ChannelConfig,
    blocked: Mutex<BTreeSet<MemberId>>,
    writer: Mutex<W>,
}

impl<W> ConsoleNotificationSink<W>
where
    W: Write + Send,
{
    /// Creates a sink writing to `writer`.
    #[must_use]
    pub fn new(renderer: NotificationRenderer, channels: ChannelConfig, writer: W) -> Self {
        Self {
            renderer,
            channels,
            blocked: Mutex::new(BTreeSet::new()),
            writer: Mutex::new(writer),
        }
    }

    /// Makes direct messages to `member` fail from now on.
    pub fn block_direct_messages(&self, member: MemberId) {
        if let Ok(mut blocked) = self.blocked.lock() {
            blocked.insert(member);
        }
    }

    /// Consumes the sink, returning the underlying writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_blocked(&self, member: MemberId) -> bool {
        self.blocked
            .lock()
            .map(|blocked| blocked.contains(&member))
            .unwrap_or(false)
    }

    fn label(&self, intent: &NotificationIntent) -> String {
        let recipient = intent
            .recipient()
            .map_or_else(|| "?".to_owned(), |member| member.to_string());
        match intent.kind() {
            DeliveryKind::EphemeralReply => format!("kun til {recipient}"),
            DeliveryKind::DirectMessage => format!("dm → {recipient}"),
            DeliveryKind::PublicOpenFeedPost => self.channels.open_feed(),
            DeliveryKind::PublicOpenFeedUpdate => {
                format!("{} (opdatering)", self.channels.open_feed())
            }
            DeliveryKind::PublicResolvedFeedPost => self.channels.resolved_feed(),
        }
    }
}

#[async_trait]
impl<W> NotificationSink for ConsoleNotificationSink<W>
where
    W: Write + Send,
{
    async fn deliver(&self, intent: &NotificationIntent) -> Result<(), DeliveryError> {
        let blocked_recipient = match (intent.kind(), intent.recipient()) {
            (DeliveryKind::DirectMessage, Some(member)) if self.is_blocked(member) => Some(member),
            _ => None,
        };
        if let Some(member) = blocked_recipient {
            return Err(DeliveryError::Unreachable(member));
        }

        let text = self
            .renderer
            .render(intent)
            .map_err(|err| DeliveryError::Render(err.to_string()))?;
        let label = self.label(intent);

        let mut writer = self
            .writer
            .lock()
            .map_err(|err| DeliveryError::transport(std::io::Error::other(err.to_string())))?;
        writeln!(writer, "[{label}] {text}").map_err(DeliveryError::transport)?;
        writer.flush().map_err(DeliveryError::transport)
    }
}
