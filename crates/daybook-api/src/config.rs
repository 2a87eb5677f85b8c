//! Configuration management for the Daybook service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use daybook_notion::ClientConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The struct is built once at process start and shared by reference with
/// every request handler. The API secret and the diary database id default
/// to empty: their absence is reported per request in the response body, so
/// a misconfigured instance still starts and answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Notion
    /// Integration secret for the document database API.
    ///
    /// Environment variable: `NOTION_API_KEY`
    #[serde(default, alias = "NOTION_API_KEY")]
    pub notion_api_key: String,
    /// Identifier of the work-diaries database.
    ///
    /// Environment variable: `DIARY_DATABASE_ID`
    #[serde(default, alias = "DIARY_DATABASE_ID")]
    pub diary_database_id: String,
    /// Base URL of the document database API.
    ///
    /// Environment variable: `NOTION_BASE_URL`
    #[serde(default = "default_base_url", alias = "NOTION_BASE_URL")]
    pub notion_base_url: String,
    /// Timeout for outbound API calls in seconds.
    ///
    /// Environment variable: `NOTION_TIMEOUT_SECONDS`
    #[serde(default = "default_notion_timeout", alias = "NOTION_TIMEOUT_SECONDS")]
    pub notion_timeout_seconds: u64,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Loads configuration from defaults, config file, and environment
    /// variable overrides.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Converts to the Notion client's configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.notion_api_key.clone(),
            base_url: self.notion_base_url.clone(),
            timeout: Duration::from_secs(self.notion_timeout_seconds),
            ..ClientConfig::default()
        }
    }

    /// Parses the server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Returns the API secret with all but a short prefix masked for
    /// logging.
    pub fn api_key_masked(&self) -> String {
        if self.notion_api_key.is_empty() {
            return "(unset)".to_string();
        }
        let prefix: String = self.notion_api_key.chars().take(4).collect();
        format!("{prefix}***")
    }

    /// Validates configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.notion_timeout_seconds == 0 {
            anyhow::bail!("notion_timeout_seconds must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notion_api_key: String::new(),
            diary_database_id: String::new(),
            notion_base_url: default_base_url(),
            notion_timeout_seconds: default_notion_timeout(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            rust_log: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.notion.com".to_string()
}

fn default_notion_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
