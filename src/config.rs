//! Configuration management for the Sansay exporter.
//!
//! Supports loading configuration from:
//! - TOML configuration files
//! - Environment variables (with `SANSAY_EXPORTER__` prefix)

use crate::error::{Result, SansayError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for the scraped switch.
#[derive(Clone, Serialize, Deserialize)]
pub struct SansayConfig {
    /// Host or URL of the XML status page (e.g., "10.0.0.5/SSConfig/webresources/stats")
    pub target: String,

    /// HTTP Basic username
    #[serde(default)]
    pub username: String,

    /// HTTP Basic password
    #[serde(default)]
    pub password: String,

    /// Verify TLS certificates (set to false for self-signed certs)
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for SansayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SansayConfig")
            .field("target", &self.target)
            .field("username", &self.username)
            .field("password", &"***REDACTED***")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Exporter specific settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExporterConfig {
    /// Address to listen on for metrics endpoint
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            log_level: default_log_level(),
        }
    }
}

/// Main configuration structure for the Sansay exporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Switch connection configuration
    pub sansay: SansayConfig,

    /// Exporter server configuration
    #[serde(default)]
    pub exporter: ExporterConfig,
}

fn default_verify_tls() -> bool {
    false
}

fn default_timeout() -> u64 {
    10
}

fn default_listen_address() -> String {
    "0.0.0.0:9814".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load configuration from a file and environment variables.
    ///
    /// Environment variables take precedence over the file, using `__` to
    /// separate the section from the key, e.g. `SANSAY_EXPORTER__SANSAY__TARGET`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sansay_exporter::config::Settings;
    ///
    /// let settings = Settings::load(Some("config/default.toml")).unwrap();
    /// ```
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(config::File::with_name(path));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SANSAY_EXPORTER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration settings.
    fn validate(&self) -> Result<()> {
        if self.sansay.target.trim().is_empty() {
            return Err(SansayError::Config(config::ConfigError::Message(
                "Sansay target cannot be empty".to_string(),
            )));
        }

        if self.sansay.timeout_seconds == 0 {
            return Err(SansayError::Config(config::ConfigError::Message(
                "timeout_seconds must be greater than zero".to_string(),
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sansay: SansayConfig {
                target: String::new(),
                username: String::new(),
                password: String::new(),
                verify_tls: default_verify_tls(),
                timeout_seconds: default_timeout(),
            },
            exporter: ExporterConfig::default(),
        }
    }
}
