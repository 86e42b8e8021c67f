//! Configuration loading from TOML files and environment variables.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ChatError;

/// Failure text shown to the user when an exchange fails.
pub const DEFAULT_ERROR_MESSAGE: &str =
    "Désolé, une erreur s'est produite. Assurez-vous que les API keys sont configurées dans le fichier .env";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Chat endpoint and HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the chat backend.
    pub base_url: String,

    /// Path of the streaming endpoint (POST, SSE response).
    pub stream_path: String,

    /// Path of the non-streaming endpoint (POST, JSON response).
    pub chat_path: String,

    /// Path of the health endpoint (GET).
    pub health_path: String,

    /// Transport provider: "http" or "mock".
    pub transport: String,

    /// TCP connect timeout (seconds). Reads are never timed out.
    pub connect_timeout_secs: Option<u64>,

    /// Maximum idle connections per host in pool.
    pub pool_max_idle_per_host: usize,

    /// Skip TLS certificate verification.
    pub insecure_ssl: bool,

    /// Force HTTP/1.1.
    pub http1_only: bool,

    /// Delay between tokens emitted by the mock transport (milliseconds).
    pub mock_token_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            stream_path: "/api/chat/stream".to_string(),
            chat_path: "/api/chat".to_string(),
            health_path: "/api/chat/health".to_string(),
            transport: "http".to_string(),
            connect_timeout_secs: None,
            pool_max_idle_per_host: 4,
            insecure_ssl: false,
            http1_only: false,
            mock_token_delay_ms: 30,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn mock_token_delay(&self) -> Duration {
        Duration::from_millis(self.mock_token_delay_ms)
    }

    /// Join the base URL and an endpoint path without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn stream_url(&self) -> String {
        self.endpoint(&self.stream_path)
    }

    pub fn chat_url(&self) -> String {
        self.endpoint(&self.chat_path)
    }

    pub fn health_url(&self) -> String {
        self.endpoint(&self.health_path)
    }
}

/// Display text configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Bot message appended when an exchange fails.
    pub error_message: String,

    /// Placeholder shown while waiting for the response head.
    pub typing_indicator: String,

    /// Prefix for user messages in the terminal transcript.
    pub user_label: String,

    /// Prefix for bot messages in the terminal transcript.
    pub bot_label: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            typing_indicator: "...".to_string(),
            user_label: "you".to_string(),
            bot_label: "bot".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn").
    pub level: String,

    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ChatError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ChatError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ChatError> {
        toml::from_str(content)
            .map_err(|e| ChatError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from file, then apply environment variable overrides.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ChatError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Client overrides
        if let Some(v) = var("CHAT_BASE_URL") {
            self.client.base_url = v;
        }
        if let Some(v) = var("CHAT_STREAM_PATH") {
            self.client.stream_path = v;
        }
        if let Some(v) = var("CHAT_TRANSPORT") {
            self.client.transport = v;
        }
        if let Some(v) = var("CHAT_CONNECT_TIMEOUT") {
            if let Ok(n) = v.parse() {
                self.client.connect_timeout_secs = Some(n);
            }
        }

        // UI overrides
        if let Some(v) = var("CHAT_ERROR_MESSAGE") {
            self.ui.error_message = v;
        }

        // Logging overrides
        if let Some(v) = var("CHAT_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("CHAT_LOG_FORMAT") {
            self.logging.format = v;
        }
    }
}
