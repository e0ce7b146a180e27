//! Runtime configuration for the task board.
//!
//! Values are layered with the following precedence, lowest first:
//!
//! 1. Built-in defaults
//! 2. `taskboard.toml` in the working directory, when present
//! 3. Environment variables prefixed with `TASKBOARD_`, using `__` between
//!    nested keys (e.g. `TASKBOARD_ROLES__CLAIMER_ROLE=Pusher`)
//!
//! A `.env` file is read into the process environment before the layers are
//! resolved. Configuration is read once at startup and handed to the board by
//! reference; the board never mutates it.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::board::domain::RolePolicy;
use crate::board::services::{
    DEFAULT_DIRECT_MESSAGE_TIMEOUT, DEFAULT_FEED_ATTEMPT_TIMEOUT, DEFAULT_FEED_ATTEMPTS,
    DeliveryPolicy,
};

/// File stem of the optional configuration file.
pub const CONFIG_FILE_STEM: &str = "taskboard";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "TASKBOARD";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be read or deserialised.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The `.env` file exists but could not be parsed.
    #[error("failed to read .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// No role grants task creation.
    #[error("at least one creator role must be configured")]
    NoCreatorRoles,

    /// The claimer role name is blank.
    #[error("the claimer role must not be empty")]
    EmptyClaimerRole,

    /// Public feed deliveries would never be attempted.
    #[error("feed_post_attempts must be at least 1")]
    ZeroFeedAttempts,

    /// Every feed post or reply attempt would time out immediately.
    #[error("attempt_timeout_ms must be at least 1")]
    ZeroAttemptTimeout,
}

/// Top-level board configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Role names granting capabilities.
    pub roles: RoleConfig,
    /// Feed channel identities.
    pub channels: ChannelConfig,
    /// Notification delivery settings.
    pub delivery: DeliveryConfig,
    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Role names granting board capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoleConfig {
    /// Holding any of these roles grants task creation.
    pub creator_roles: Vec<String>,
    /// Holding this role grants task claiming.
    pub claimer_role: String,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            creator_roles: vec!["Fuldgyldigt".to_owned(), "Ledelse".to_owned()],
            claimer_role: "Pusher".to_owned(),
        }
    }
}

impl RoleConfig {
    /// Builds the role policy described by this configuration.
    #[must_use]
    pub fn policy(&self) -> RolePolicy {
        RolePolicy::new(self.creator_roles.iter().cloned(), self.claimer_role.clone())
    }
}

/// Identities of the public feeds.
///
/// A configured numeric id takes precedence over the channel name; see
/// [`ChannelConfig::open_feed`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Name of the open-tasks channel.
    pub open_feed_name: String,
    /// Name of the resolved-tasks channel.
    pub resolved_feed_name: String,
    /// Platform id of the open-tasks channel, if known.
    pub open_feed_id: Option<u64>,
    /// Platform id of the resolved-tasks channel, if known.
    pub resolved_feed_id: Option<u64>,
}

impl ChannelConfig {
    /// Returns the destination for open-feed posts and updates: the channel
    /// mention when the id is known, otherwise `#name`.
    #[must_use]
    pub fn open_feed(&self) -> String {
        feed_destination(self.open_feed_id, &self.open_feed_name)
    }

    /// Returns the destination for resolved-feed posts, resolved like
    /// [`ChannelConfig::open_feed`].
    #[must_use]
    pub fn resolved_feed(&self) -> String {
        feed_destination(self.resolved_feed_id, &self.resolved_feed_name)
    }
}

fn feed_destination(id: Option<u64>, name: &str) -> String {
    id.map_or_else(|| format!("#{name}"), |channel| format!("<#{channel}>"))
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            open_feed_name: "opgaver".to_owned(),
            resolved_feed_name: "klarede-opgaver".to_owned(),
            open_feed_id: None,
            resolved_feed_id: None,
        }
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Time allowed for a direct message, in milliseconds.
    pub direct_message_timeout_ms: u64,
    /// Attempts made for each public feed delivery.
    pub feed_post_attempts: u32,
    /// Time allowed for each feed post or reply attempt, in milliseconds.
    pub attempt_timeout_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            direct_message_timeout_ms: u64::try_from(DEFAULT_DIRECT_MESSAGE_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
            feed_post_attempts: DEFAULT_FEED_ATTEMPTS,
            attempt_timeout_ms: u64::try_from(DEFAULT_FEED_ATTEMPT_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl DeliveryConfig {
    /// Builds the delivery policy described by this configuration.
    #[must_use]
    pub fn policy(&self) -> DeliveryPolicy {
        DeliveryPolicy::new(
            Duration::from_millis(self.direct_message_timeout_ms),
            self.feed_post_attempts,
        )
        .with_attempt_timeout(Duration::from_millis(self.attempt_timeout_ms))
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// File that also receives plain-text log records, if any.
    pub log_file: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            json: false,
            log_file: None,
        }
    }
}

impl BoardConfig {
    /// Loads configuration from `.env`, `taskboard.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be read or the resulting
    /// configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        load_env_file()?;

        let mut builder = Config::builder();
        if Path::new(&format!("{CONFIG_FILE_STEM}.toml")).exists() {
            builder = builder.add_source(File::with_name(CONFIG_FILE_STEM));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("roles.creator_roles")
                .try_parsing(true),
        );

        Self::from_config(builder.build()?)
    }

    /// Parses configuration from TOML text layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is malformed or the resulting
    /// configuration is invalid.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_config(source)
    }

    fn from_config(source: Config) -> Result<Self, ConfigError> {
        let parsed: Self = source.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks invariants the board relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCreatorRoles`],
    /// [`ConfigError::EmptyClaimerRole`], [`ConfigError::ZeroFeedAttempts`] or
    /// [`ConfigError::ZeroAttemptTimeout`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .roles
            .creator_roles
            .iter()
            .all(|role| role.trim().is_empty())
        {
            return Err(ConfigError::NoCreatorRoles);
        }
        if self.roles.claimer_role.trim().is_empty() {
            return Err(ConfigError::EmptyClaimerRole);
        }
        if self.delivery.feed_post_attempts == 0 {
            return Err(ConfigError::ZeroFeedAttempts);
        }
        if self.delivery.attempt_timeout_ms == 0 {
            return Err(ConfigError::ZeroAttemptTimeout);
        }
        Ok(())
    }
}

fn load_env_file() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded environment from .env file");
            Ok(())
        }
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err.into()),
    }
}
