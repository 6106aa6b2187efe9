//! Single-date forecast helper

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;
use crate::error::{DATE_FORMAT_HINT, SkycastError};
use crate::model::RandomForest;

/// Wind speed assumed when the caller does not supply one, in m/s
pub const DEFAULT_WIND_SPEED: f64 = 5.0;

/// Forecast for a single day, each value rounded to one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Date the forecast is for
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Predicted temperature in Celsius
    #[serde(rename = "Temperature (°C)")]
    pub temperature_c: f64,
    /// Predicted rainfall in mm
    #[serde(rename = "Rainfall (mm)")]
    pub rainfall_mm: f64,
    /// Predicted relative humidity in percent
    #[serde(rename = "Humidity (%)")]
    pub humidity_pct: f64,
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1} °C, {:.1} mm rain, {:.1} % humidity",
            self.date, self.temperature_c, self.rainfall_mm, self.humidity_pct
        )
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Predict the weather for one date given an expected wind speed.
///
/// The date must be `YYYY-MM-DD`; anything else fails with the fixed
/// guidance message instead of a parse error dump.
pub fn forecast_for(model: &RandomForest, date_str: &str, wind_speed: f64) -> Result<Forecast> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| SkycastError::validation(DATE_FORMAT_HINT))?;

    let features = [
        f64::from(date.ordinal()),
        f64::from(date.month()),
        f64::from(date.year()),
        wind_speed,
    ];
    let prediction = model.predict(&features);

    Ok(Forecast {
        date,
        temperature_c: round1(prediction[0]),
        rainfall_mm: round1(prediction[1]),
        humidity_pct: round1(prediction[2]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{N_FEATURES, N_OUTPUTS};
    use crate::model::ForestConfig;

    fn tiny_model() -> RandomForest {
        let features: Vec<[f64; N_FEATURES]> = (0..40)
            .map(|i| [f64::from(i) * 9.0, 1.0, 2024.0, 5.0])
            .collect();
        let targets: Vec<[f64; N_OUTPUTS]> =
            (0..40).map(|i| [f64::from(i), 1.0, 50.0]).collect();
        RandomForest::fit(ForestConfig::default(), &features, &targets).unwrap()
    }

    #[test]
    fn test_valid_date_yields_three_numeric_fields() {
        let model = tiny_model();
        let forecast = forecast_for(&model, "2025-04-13", DEFAULT_WIND_SPEED).unwrap();
        assert_eq!(
            forecast.date,
            NaiveDate::from_ymd_opt(2025, 4, 13).unwrap()
        );
        assert!(forecast.temperature_c.is_finite());
        assert!(forecast.rainfall_mm.is_finite());
        assert!(forecast.humidity_pct.is_finite());
    }

    #[test]
    fn test_invalid_date_returns_fixed_hint() {
        let model = tiny_model();
        for bad in ["13-04-2025", "2025/04/13", "someday", ""] {
            let err = forecast_for(&model, bad, DEFAULT_WIND_SPEED).unwrap_err();
            assert_eq!(err.user_message(), DATE_FORMAT_HINT, "input {bad:?}");
        }
    }

    #[test]
    fn test_values_are_rounded_to_one_decimal() {
        let model = tiny_model();
        let forecast = forecast_for(&model, "2024-06-15", DEFAULT_WIND_SPEED).unwrap();
        for value in [
            forecast.temperature_c,
            forecast.rainfall_mm,
            forecast.humidity_pct,
        ] {
            assert!(((value * 10.0).round() - value * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_json_keys_match_report_labels() {
        let model = tiny_model();
        let forecast = forecast_for(&model, "2025-04-13", DEFAULT_WIND_SPEED).unwrap();
        let json = serde_json::to_string(&forecast).unwrap();
        assert!(json.contains("\"Date\""));
        assert!(json.contains("\"Temperature (°C)\""));
        assert!(json.contains("\"Rainfall (mm)\""));
        assert!(json.contains("\"Humidity (%)\""));
    }
}
