/// Configuration management for the creator rights registry
use crate::error::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "creator_rights=debug";

/// Main registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub registry: RegistrySettings,
    pub jobs: JobsConfig,
    pub seed: SeedConfig,
    pub logging: LoggingConfig,
}

/// Registry service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Actor recorded as `invited_by` / `credited_by`
    pub operator: String,
    /// Artificial delay applied before every operation (milliseconds)
    pub simulated_latency_ms: u64,
    /// Capacity of the registry event broadcast channel
    pub event_buffer: usize,
}

/// Background job intervals (seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    pub rights_check_interval: u64,
    pub alert_sweep_interval: u64,
}

/// Start-up seed data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub seed_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            operator: "admin".to_string(),
            simulated_latency_ms: 0,
            event_buffer: 256,
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            rights_check_interval: 3600,
            alert_sweep_interval: 21600,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry: RegistrySettings::default(),
            jobs: JobsConfig::default(),
            seed: SeedConfig { seed_file: None },
            logging: LoggingConfig {
                level: DEFAULT_LOG_FILTER.to_string(),
                json: false,
            },
        }
    }
}

impl RegistrySettings {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> RegistryResult<Self> {
        dotenv::dotenv().ok();

        let operator = env::var("REGISTRY_OPERATOR").unwrap_or_else(|_| "admin".to_string());
        let simulated_latency_ms = env::var("REGISTRY_SIMULATED_LATENCY_MS")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| RegistryError::Validation("Invalid simulated latency".to_string()))?;
        let event_buffer = env::var("REGISTRY_EVENT_BUFFER")
            .unwrap_or_else(|_| "256".to_string())
            .parse()
            .unwrap_or(256);

        let rights_check_interval = env::var("REGISTRY_RIGHTS_CHECK_INTERVAL")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let alert_sweep_interval = env::var("REGISTRY_ALERT_SWEEP_INTERVAL")
            .unwrap_or_else(|_| "21600".to_string())
            .parse()
            .unwrap_or(21600);

        let seed_file = env::var("REGISTRY_SEED_FILE").ok().map(PathBuf::from);

        let level = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        let json = env::var("REGISTRY_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(RegistryConfig {
            registry: RegistrySettings {
                operator,
                simulated_latency_ms,
                event_buffer,
            },
            jobs: JobsConfig {
                rights_check_interval,
                alert_sweep_interval,
            },
            seed: SeedConfig { seed_file },
            logging: LoggingConfig { level, json },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> RegistryResult<()> {
        if self.registry.operator.trim().is_empty() {
            return Err(RegistryError::Validation("Operator cannot be empty".to_string()));
        }

        if self.registry.event_buffer == 0 {
            return Err(RegistryError::Validation(
                "Event buffer must hold at least one event".to_string(),
            ));
        }

        if self.jobs.rights_check_interval == 0 || self.jobs.alert_sweep_interval == 0 {
            return Err(RegistryError::Validation(
                "Job intervals must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
