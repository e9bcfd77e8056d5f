//! Bot configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use court_types::Roster;
use court_utils::LogFormat;

use crate::NodeError;

/// How updates reach the bot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    /// Long-poll `getUpdates`. Used in development.
    #[default]
    Polling,
    /// Telegram pushes updates to `POST /webhook`.
    Webhook,
}

impl FromStr for BotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polling" | "development" | "dev" => Ok(Self::Polling),
            "webhook" | "production" | "prod" => Ok(Self::Webhook),
            other => Err(format!("unknown bot mode '{other}' (expected polling or webhook)")),
        }
    }
}

impl fmt::Display for BotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polling => write!(f, "polling"),
            Self::Webhook => write!(f, "webhook"),
        }
    }
}

/// Configuration for the court bot.
///
/// Can be loaded from a TOML file via [`BotConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotConfig {
    /// Polling or webhook.
    #[serde(default)]
    pub mode: BotMode,

    /// Port for the HTTP server (health, webhook, metrics).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bot API token. Never written back out.
    #[serde(default, skip_serializing)]
    pub bot_token: String,

    /// Bot API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Public base URL of this service, used to register the webhook.
    #[serde(default)]
    pub external_url: Option<String>,

    /// Data directory for record storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Long-poll timeout for `getUpdates`, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to serve Prometheus metrics at `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Nominatable members: username to display name.
    #[serde(default = "default_roster")]
    pub roster: BTreeMap<String, String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_port() -> u16 {
    3000
}

fn default_api_base_url() -> String {
    court_telegram::client::DEFAULT_API_BASE.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./court_data")
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_roster() -> BTreeMap<String, String> {
    Roster::default()
        .iter()
        .map(|(user, name)| (user.to_string(), name.to_string()))
        .collect()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BotConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string. The token is omitted.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// The roster as configured.
    pub fn roster(&self) -> Roster {
        Roster::new(self.roster.iter().map(|(u, n)| (u.as_str(), n.as_str())))
    }

    /// `{external_url}/webhook`, if an external URL is set.
    pub fn webhook_url(&self) -> Option<String> {
        self.external_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| format!("{}/webhook", url.trim_end_matches('/')))
    }

    /// Check the settings the bot cannot start without.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.bot_token.trim().is_empty() {
            return Err(NodeError::Config("bot token is required".into()));
        }
        if self.roster.is_empty() {
            return Err(NodeError::Config("roster must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            mode: BotMode::default(),
            port: default_port(),
            bot_token: String::new(),
            api_base_url: default_api_base_url(),
            external_url: None,
            data_dir: default_data_dir(),
            poll_timeout_secs: default_poll_timeout_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            enable_metrics: false,
            roster: default_roster(),
        }
    }
}
