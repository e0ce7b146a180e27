//! Plain-text rendering of notification intents.
//!
//! The wording follows the Danish phrasing the board has always used in its
//! channels. Mentions use the `<@id>` form the chat platform expands.

use minijinja::{Environment, Value};
use thiserror::Error;

use crate::board::domain::{Acknowledgement, DenialReason, NotificationIntent, NotificationPayload};

const TASK_CARD: &str = "task_card";
const CLAIMED_CARD: &str = "claimed_card";
const CARD_REMOVED: &str = "card_removed";
const RESOLUTION_RECORD: &str = "resolution_record";
const RESOLUTION_NOTICE: &str = "resolution_notice";

const TEMPLATES: [(&str, &str); 5] = [
    (
        TASK_CARD,
        "📌 Ny opgave\n🧾 {{ description }}{% if price %}\n💰 Pris: {{ price }}{% endif %}\n📝 Oprettet af: <@{{ creator }}>",
    ),
    (
        CLAIMED_CARD,
        "🧾 Opgave: **{{ description }}**\n👤 Tager: <@{{ claimant }}>",
    ),
    (CARD_REMOVED, "Opgave {{ task_id }} er fjernet fra tavlen."),
    (
        RESOLUTION_RECORD,
        "✅ Opgave klaret!\n🧾 **{{ description }}**\n👤 Tager: <@{{ claimant }}>\n📨 Oprettet af: <@{{ creator }}>",
    ),
    (
        RESOLUTION_NOTICE,
        "🎉 **Din opgave er blevet løst!**\n\n🧾 **Opgave:** {{ description }}\n👤 **Løst af:** {% if claimant_name %}{{ claimant_name }}{% else %}<@{{ claimant }}>{% endif %}\n\nOpgaven er nu markeret som afsluttet. Tak for at bruge opgavesystemet!",
    ),
];

/// Errors raised while rendering a notification.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template compilation or evaluation failed.
    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Renders intents to message text.
#[derive(Debug)]
pub struct NotificationRenderer {
    environment: Environment<'static>,
}

impl NotificationRenderer {
    /// Creates a renderer with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] when a built-in template fails to
    /// compile.
    pub fn new() -> Result<Self, RenderError> {
        let mut environment = Environment::new();
        for (name, source) in TEMPLATES {
            environment.add_template(name, source)?;
        }
        Ok(Self { environment })
    }

    /// Renders the text for `intent`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] when template evaluation fails.
    pub fn render(&self, intent: &NotificationIntent) -> Result<String, RenderError> {
        let payload = intent.payload();
        let template = match payload {
            NotificationPayload::TaskCard { .. } => TASK_CARD,
            NotificationPayload::ClaimedCard { .. } => CLAIMED_CARD,
            NotificationPayload::CardRemoved { .. } => CARD_REMOVED,
            NotificationPayload::ResolutionRecord { .. } => RESOLUTION_RECORD,
            NotificationPayload::ResolutionNotice { .. } => RESOLUTION_NOTICE,
            NotificationPayload::Acknowledgement { acknowledgement } => {
                return Ok(acknowledgement_text(*acknowledgement).to_owned());
            }
            NotificationPayload::Denial { reason } => {
                return Ok(denial_text(*reason).to_owned());
            }
        };

        let rendered = self
            .environment
            .get_template(template)?
            .render(Value::from_serialize(payload))?;
        Ok(rendered)
    }
}

const fn acknowledgement_text(acknowledgement: Acknowledgement) -> &'static str {
    match acknowledgement {
        Acknowledgement::TaskCreated => "Opgave oprettet.",
        Acknowledgement::TaskResolved => "Opgave markeret som klaret!",
    }
}

const fn denial_text(reason: DenialReason) -> &'static str {
    match reason {
        DenialReason::NotPermittedToCreate => "Du har ikke tilladelse til at oprette opgaver.",
        DenialReason::NotPermittedToClaim => "Du skal være pusher for at tage opgaver!",
        DenialReason::NotClaimant => "Kun den der tog opgaven kan markere den som klaret!",
        DenialReason::EmptyDescription => "Opgaven skal have en beskrivelse.",
        DenialReason::AlreadyClaimed => "Opgaven er allerede taget.",
        DenialReason::NotClaimed => "Opgaven skal tages, før den kan markeres som klaret.",
        DenialReason::AlreadyResolved => "Opgaven er allerede klaret.",
        DenialReason::UnknownTask => "Opgaven findes ikke længere.",
        DenialReason::Internal => {
            "Der opstod en fejl ved behandling af opgaven. Prøv igen senere."
        }
    }
}
