//! `Skycast` - synthetic daily-weather dataset and random-forest forecast demo
//!
//! This library provides the pieces behind the one-shot demo binary:
//! synthetic weather generation, a train/test split, a multi-output
//! random-forest regressor, error metrics, a single-date forecast helper,
//! and a temperature chart.

pub mod config;
pub mod dataset;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod model;
pub mod plot;
pub mod split;

// Re-export core types for public API
pub use config::SkycastConfig;
pub use dataset::{DailyWeather, Dataset};
pub use error::{DATE_FORMAT_HINT, SkycastError};
pub use forecast::{DEFAULT_WIND_SPEED, Forecast, forecast_for};
pub use metrics::{OutputMetrics, evaluate, mse, r2};
pub use model::{ForestConfig, RandomForest};
pub use split::{TrainTestSplit, train_test_split};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
