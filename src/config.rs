//! Configuration management.
//!
//! Configuration is layered: built-in defaults, then `config/default`,
//! `config/local` and `config` files (any format the `config` crate
//! understands), then `CAMPAIGN_BOARD`-prefixed environment variables.

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Table-store settings
    pub store: StoreConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Aggregation-engine settings
    pub aggregation: AggregationConfig,
    /// Roster-builder settings
    pub roster: RosterConfig,
}

/// Where the table store lives and what its tables are called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one CSV file per table
    pub data_dir: String,
    /// Name of the Users table
    pub users_table: String,
    /// Name of the Messages table
    pub messages_table: String,
    /// Name of the Logs table
    pub logs_table: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Optional log file path; enables a daily-rolling JSON file layer
    pub file_path: Option<String>,
    /// Console format, "text" or "json"
    pub format: String,
}

/// Aggregation-engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// How many peak hours the hourly ranking keeps
    pub peak_hours: usize,
    /// Reserved action label counted as a check-in
    pub checkin_label: String,
}

/// Roster-builder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Surface users with dangling supervisor references instead of
    /// silently excluding them (the historical behavior)
    pub include_unassigned: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                data_dir: "data".to_string(),
                users_table: "Users".to_string(),
                messages_table: "Messages".to_string(),
                logs_table: "Logs".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            aggregation: AggregationConfig {
                peak_hours: 4,
                checkin_label: "Check-in".to_string(),
            },
            roster: RosterConfig { include_unassigned: false },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let config = Config::builder()
            // Start with default values
            .set_default("store.data_dir", defaults.store.data_dir)?
            .set_default("store.users_table", defaults.store.users_table)?
            .set_default("store.messages_table", defaults.store.messages_table)?
            .set_default("store.logs_table", defaults.store.logs_table)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("aggregation.peak_hours", defaults.aggregation.peak_hours as i64)?
            .set_default("aggregation.checkin_label", defaults.aggregation.checkin_label)?
            .set_default("roster.include_unassigned", defaults.roster.include_unassigned)?
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("CAMPAIGN_BOARD").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.store.data_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("store.data_dir must not be empty"));
        }

        for (key, name) in [
            ("store.users_table", &self.store.users_table),
            ("store.messages_table", &self.store.messages_table),
            ("store.logs_table", &self.store.logs_table),
        ] {
            if name.trim().is_empty() {
                return Err(anyhow::anyhow!("{key} must not be empty"));
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        if !(1..=24).contains(&self.aggregation.peak_hours) {
            return Err(anyhow::anyhow!("aggregation.peak_hours must be between 1 and 24"));
        }

        if self.aggregation.checkin_label.trim().is_empty() {
            return Err(anyhow::anyhow!("aggregation.checkin_label must not be empty"));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store.users_table, "Users");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.aggregation.peak_hours, 4);
        assert_eq!(config.aggregation.checkin_label, "Check-in");
        assert!(!config.roster.include_unassigned);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_peak_hours() {
        let mut config = AppConfig::default();
        config.aggregation.peak_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}
