//! Configuration management for the `Skycast` demo
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkycastError;
use crate::model::ForestConfig;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Skycast` demo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Synthetic dataset bounds and seed
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Train/test split settings
    #[serde(default)]
    pub split: SplitConfig,
    /// Random-forest hyperparameters
    #[serde(default)]
    pub model: ForestConfig,
    /// Output paths and the demo forecast
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Synthetic dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// First day of the generated series (inclusive)
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// Last day of the generated series (inclusive)
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
    /// Seed for the dataset RNG
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Train/test split settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of rows held out for testing, strictly between 0 and 1
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the split shuffle
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Output paths and the single demo forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the trained model artifact is written
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Where the temperature chart is written
    #[serde(default = "default_plot_path")]
    pub plot_path: String,
    /// Date the demo forecasts, `YYYY-MM-DD`
    #[serde(default = "default_forecast_date")]
    pub forecast_date: String,
    /// Wind speed assumed for the demo forecast, in m/s
    #[serde(default = "default_forecast_wind_speed")]
    pub forecast_wind_speed: f64,
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
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid calendar date")
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid calendar date")
}

fn default_seed() -> u64 {
    42
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_model_path() -> String {
    "skycast_model.bin".to_string()
}

fn default_plot_path() -> String {
    "temperature_plot.png".to_string()
}

fn default_forecast_date() -> String {
    "2025-04-13".to_string()
}

fn default_forecast_wind_speed() -> f64 {
    crate::forecast::DEFAULT_WIND_SPEED
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            seed: default_seed(),
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: default_test_fraction(),
            seed: default_seed(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            plot_path: default_plot_path(),
            forecast_date: default_forecast_date(),
            forecast_wind_speed: default_forecast_wind_speed(),
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

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            split: SplitConfig::default(),
            model: ForestConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SkycastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with SKYCAST_ prefix
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_dataset()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate dataset bounds
    fn validate_dataset(&self) -> Result<()> {
        if self.dataset.end_date < self.dataset.start_date {
            return Err(SkycastError::config(format!(
                "Dataset end date {} is before start date {}",
                self.dataset.end_date, self.dataset.start_date
            ))
            .into());
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !self.split.test_fraction.is_finite()
            || self.split.test_fraction <= 0.0
            || self.split.test_fraction >= 1.0
        {
            return Err(SkycastError::config(
                "Test fraction must be strictly between 0 and 1",
            )
            .into());
        }

        if self.model.n_trees == 0 || self.model.n_trees > 1000 {
            return Err(SkycastError::config(
                "Number of trees must be between 1 and 1000",
            )
            .into());
        }

        if self.model.max_depth == 0 || self.model.max_depth > 64 {
            return Err(SkycastError::config("Tree depth must be between 1 and 64").into());
        }

        if self.model.min_samples_leaf == 0 {
            return Err(SkycastError::config("Minimum leaf size must be at least 1").into());
        }

        if !self.output.forecast_wind_speed.is_finite() || self.output.forecast_wind_speed < 0.0 {
            return Err(
                SkycastError::config("Forecast wind speed must be a non-negative number").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.output.model_path.is_empty() {
            return Err(SkycastError::config("Model output path cannot be empty").into());
        }

        if self.output.plot_path.is_empty() {
            return Err(SkycastError::config("Plot output path cannot be empty").into());
        }

        Ok(())
    }
}
