//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `relaydash.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use relaydash_adapter_rest_reqwest::RestConfig;
use relaydash_adapter_socketio::SocketIoConfig;
use relaydash_app::controller::ControllerConfig;
use relaydash_domain::message::CommandStyle;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Where the hub lives and how to talk to it.
    pub hub: HubConfig,
    /// Page behaviour.
    pub dashboard: DashboardConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Hub connection configuration, shared by the real-time channel and the
/// schedule API.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Base URL of the hub.
    pub url: String,
    /// Path the Socket.IO server is mounted on.
    pub socketio_path: String,
    /// Pause between two connection attempts, in milliseconds.
    pub reconnect_delay_ms: u64,
    /// Timeout of schedule API requests, in milliseconds.
    pub request_timeout_ms: u64,
    /// Shape of the outgoing toggle command.
    pub command_style: CommandStyle,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Auto-reload interval of the home page, in seconds.
    pub refresh_seconds: u32,
    /// Lines kept in the message log.
    pub log_capacity: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `relaydash.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("relaydash.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("RELAYDASH_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("RELAYDASH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("RELAYDASH_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("RELAYDASH_HUB_URL") {
            self.hub.url = val;
        }
        if let Some(val) = var("RELAYDASH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.hub.url.trim().is_empty() {
            return Err(ConfigError::Validation("hub url must not be empty".to_string()));
        }
        if self.dashboard.log_capacity == 0 {
            return Err(ConfigError::Validation(
                "log capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn socketio(&self) -> SocketIoConfig {
        SocketIoConfig {
            url: self.hub.url.clone(),
            socketio_path: self.hub.socketio_path.clone(),
            reconnect_delay_ms: self.hub.reconnect_delay_ms,
        }
    }

    #[must_use]
    pub fn rest(&self) -> RestConfig {
        RestConfig {
            base_url: self.hub.url.clone(),
            timeout_ms: self.hub.request_timeout_ms,
        }
    }

    #[must_use]
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            log_capacity: self.dashboard.log_capacity,
            command_style: self.hub.command_style,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        let socketio = SocketIoConfig::default();
        Self {
            url: socketio.url,
            socketio_path: socketio.socketio_path,
            reconnect_delay_ms: socketio.reconnect_delay_ms,
            request_timeout_ms: RestConfig::default().timeout_ms,
            command_style: CommandStyle::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_seconds: 5,
            log_capacity: ControllerConfig::default().log_capacity,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "relaydashd=info,relaydash=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
