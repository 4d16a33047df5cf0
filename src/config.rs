//! Configuration management for the zipweather services
//!
//! Settings are layered: built-in defaults, then an optional `zipweather.toml`,
//! then `ZIPWEATHER__*` environment variables, then the plain `PORT` and
//! `WEATHER_API_KEY` variables the services have always honoured.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which of the two hops a process runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Hop 1, `POST /zipcode`
    Gateway,
    /// Hop 2, `GET /temperature`
    Orchestrator,
}

impl Service {
    #[must_use]
    pub fn default_port(self) -> u16 {
        match self {
            Service::Gateway => 8080,
            Service::Orchestrator => 8081,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Service::Gateway => "zipweather-gateway",
            Service::Orchestrator => "zipweather-orchestrator",
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener settings
    pub server: ServerConfig,
    /// Hop 1 settings
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// External lookup endpoints and credentials
    #[serde(default)]
    pub lookups: LookupConfig,
    /// OpenTelemetry exporter settings
    pub telemetry: TelemetryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    pub port: u16,
}

/// Gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the orchestrator hop
    #[serde(default = "default_orchestrator_url")]
    pub orchestrator_url: String,
}

/// External lookup settings used by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Postal lookup base; the code and `/json/` are appended
    #[serde(default = "default_postal_base_url")]
    pub postal_base_url: String,
    /// Weather lookup endpoint; `key` and `q` are added as query parameters
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Weather API key
    #[serde(default)]
    pub weather_api_key: Option<String>,
}

/// Trace export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Export spans over OTLP
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,
    /// `service.name` resource attribute
    pub service_name: String,
    /// OTLP/HTTP traces endpoint
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    /// Delay between batch exports in milliseconds
    #[serde(default = "default_batch_timeout_ms")]
    pub batch_timeout_ms: u64,
    /// Maximum spans per export batch
    #[serde(default = "default_max_export_batch_size")]
    pub max_export_batch_size: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_orchestrator_url() -> String {
    "http://service-b:8081".to_string()
}

fn default_postal_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1/current.json".to_string()
}

fn default_telemetry_enabled() -> bool {
    true
}

fn default_otlp_endpoint() -> String {
    "http://otel-collector:4318/v1/traces".to_string()
}

fn default_batch_timeout_ms() -> u64 {
    5000
}

fn default_max_export_batch_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            orchestrator_url: default_orchestrator_url(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            postal_base_url: default_postal_base_url(),
            weather_base_url: default_weather_base_url(),
            weather_api_key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Defaults for a service, before any file or environment source
    #[must_use]
    pub fn defaults_for(service: Service) -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: service.default_port(),
            },
            gateway: GatewayConfig::default(),
            lookups: LookupConfig::default(),
            telemetry: TelemetryConfig {
                enabled: default_telemetry_enabled(),
                service_name: service.name().to_string(),
                otlp_endpoint: default_otlp_endpoint(),
                batch_timeout_ms: default_batch_timeout_ms(),
                max_export_batch_size: default_max_export_batch_size(),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from file and environment variables
    pub fn load(service: Service) -> Result<Self> {
        Self::load_from_path(service, None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(service: Service, config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from("zipweather.toml"));

        let builder = Config::builder()
            .set_default("server.port", i64::from(service.default_port()))?
            .set_default("telemetry.service_name", service.name())?
            .add_source(
                File::from(config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            )
            .add_source(
                Environment::with_prefix("ZIPWEATHER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option(
                "lookups.weather_api_key",
                std::env::var("WEATHER_API_KEY").ok(),
            )?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate(service)?;

        Ok(config)
    }

    /// Validate all configuration settings for the given service
    pub fn validate(&self, service: Service) -> Result<()> {
        self.validate_urls(service)?;
        self.validate_api_keys(service)?;
        self.validate_telemetry()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_urls(&self, service: Service) -> Result<()> {
        let urls = match service {
            Service::Gateway => vec![("orchestrator URL", self.gateway.orchestrator_url.as_str())],
            Service::Orchestrator => vec![
                ("postal lookup URL", self.lookups.postal_base_url.as_str()),
                ("weather lookup URL", self.lookups.weather_base_url.as_str()),
            ],
        };

        for (what, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::invalid(format!(
                    "The {what} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// The orchestrator cannot reach the weather lookup without a key
    pub fn validate_api_keys(&self, service: Service) -> Result<()> {
        if service != Service::Orchestrator {
            return Ok(());
        }

        match self.lookups.weather_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::invalid(
                "Weather API key is missing. Set WEATHER_API_KEY or lookups.weather_api_key.",
            )
            .into()),
        }
    }

    fn validate_telemetry(&self) -> Result<()> {
        if !self.telemetry.enabled {
            return Ok(());
        }

        if self.telemetry.max_export_batch_size == 0 {
            return Err(
                ConfigError::invalid("Telemetry max export batch size must be positive").into(),
            );
        }

        if self.telemetry.batch_timeout_ms == 0 {
            return Err(ConfigError::invalid("Telemetry batch timeout must be positive").into());
        }

        if self.telemetry.service_name.is_empty() {
            return Err(ConfigError::invalid("Telemetry service name cannot be empty").into());
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
