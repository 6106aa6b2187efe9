//! Synthetic daily-weather dataset
//!
//! Generates one row per calendar day between two inclusive bounds. Each
//! output follows a yearly sinusoid plus Gaussian noise; wind speed is
//! uniform. Generation is fully determined by the seed and the bounds.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::Result;
use crate::error::SkycastError;

/// Number of input features per row (`day_of_year`, `month`, `year`, `wind_speed`)
pub const N_FEATURES: usize = 4;
/// Number of predicted outputs per row
pub const N_OUTPUTS: usize = 3;
/// Display names of the predicted outputs, in matrix column order
pub const OUTPUT_NAMES: [&str; N_OUTPUTS] = ["Temperature", "Rainfall", "Humidity"];

// Seasonal model parameters
const SEASON_PERIOD_DAYS: f64 = 365.0;
const TEMPERATURE_MEAN: f64 = 20.0;
const TEMPERATURE_AMPLITUDE: f64 = 10.0;
const TEMPERATURE_NOISE_STD: f64 = 2.0;
const RAINFALL_AMPLITUDE: f64 = 5.0;
const RAINFALL_NOISE_STD: f64 = 3.0;
const HUMIDITY_MEAN: f64 = 60.0;
const HUMIDITY_AMPLITUDE: f64 = 20.0;
const HUMIDITY_NOISE_STD: f64 = 5.0;
const WIND_SPEED_MIN: f64 = 1.0;
const WIND_SPEED_MAX: f64 = 10.0;

/// One synthetic day of weather measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    /// Calendar date of this row
    pub date: NaiveDate,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Rainfall in mm, never negative
    pub rainfall: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

impl DailyWeather {
    /// 1-based ordinal day within the year
    #[must_use]
    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }

    /// Month number (1-12)
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Calendar year
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Input feature vector for the regressor
    #[must_use]
    pub fn features(&self) -> [f64; N_FEATURES] {
        [
            f64::from(self.day_of_year()),
            f64::from(self.month()),
            f64::from(self.year()),
            self.wind_speed,
        ]
    }

    /// Target vector, in [`OUTPUT_NAMES`] column order
    #[must_use]
    pub fn targets(&self) -> [f64; N_OUTPUTS] {
        [self.temperature, self.rainfall, self.humidity]
    }
}

/// The full synthetic dataset, one row per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<DailyWeather>,
}

impl Dataset {
    /// Generate the dataset between two inclusive calendar bounds.
    ///
    /// The same seed and bounds always produce the identical dataset.
    pub fn generate(start: NaiveDate, end: NaiveDate, seed: u64) -> Result<Self> {
        if end < start {
            return Err(SkycastError::dataset(format!(
                "end date {end} is before start date {start}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let temperature_noise = Normal::new(0.0, TEMPERATURE_NOISE_STD)
            .map_err(|e| SkycastError::dataset(e.to_string()))?;
        let rainfall_noise = Normal::new(0.0, RAINFALL_NOISE_STD)
            .map_err(|e| SkycastError::dataset(e.to_string()))?;
        let humidity_noise = Normal::new(0.0, HUMIDITY_NOISE_STD)
            .map_err(|e| SkycastError::dataset(e.to_string()))?;

        let rows = start
            .iter_days()
            .take_while(|day| *day <= end)
            .enumerate()
            .map(|(i, date)| {
                let phase = (i as f64 * TAU / SEASON_PERIOD_DAYS).sin();
                let temperature = TEMPERATURE_MEAN
                    + TEMPERATURE_AMPLITUDE * phase
                    + temperature_noise.sample(&mut rng);
                let rainfall =
                    (RAINFALL_AMPLITUDE * phase + rainfall_noise.sample(&mut rng)).max(0.0);
                let humidity =
                    HUMIDITY_MEAN + HUMIDITY_AMPLITUDE * phase + humidity_noise.sample(&mut rng);
                let wind_speed = rng.random_range(WIND_SPEED_MIN..WIND_SPEED_MAX);
                DailyWeather {
                    date,
                    temperature,
                    rainfall,
                    humidity,
                    wind_speed,
                }
            })
            .collect();

        Ok(Self { rows })
    }

    /// Number of rows (days)
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in date order
    #[must_use]
    pub fn rows(&self) -> &[DailyWeather] {
        &self.rows
    }

    /// Input matrix `X`, one feature vector per row
    #[must_use]
    pub fn feature_matrix(&self) -> Vec<[f64; N_FEATURES]> {
        self.rows.iter().map(DailyWeather::features).collect()
    }

    /// Target matrix `Y`, one output vector per row
    #[must_use]
    pub fn target_matrix(&self) -> Vec<[f64; N_OUTPUTS]> {
        self.rows.iter().map(DailyWeather::targets).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_row_count_matches_inclusive_bounds() {
        let dataset =
            Dataset::generate(date(2020, 1, 1), date(2024, 12, 31), 42).unwrap();
        // 2020 and 2024 are leap years: 366 + 365 * 3 + 366
        assert_eq!(dataset.len(), 1827);
    }

    #[test]
    fn test_single_day_bounds() {
        let dataset = Dataset::generate(date(2022, 6, 1), date(2022, 6, 1), 42).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows()[0].date, date(2022, 6, 1));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let result = Dataset::generate(date(2022, 6, 2), date(2022, 6, 1), 42);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = Dataset::generate(date(2020, 1, 1), date(2020, 12, 31), 42).unwrap();
        let b = Dataset::generate(date(2020, 1, 1), date(2020, 12, 31), 42).unwrap();
        assert_eq!(a, b);

        let c = Dataset::generate(date(2020, 1, 1), date(2020, 12, 31), 7).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_value_ranges() {
        let dataset = Dataset::generate(date(2020, 1, 1), date(2021, 12, 31), 42).unwrap();
        for row in dataset.rows() {
            assert!(row.rainfall >= 0.0, "rainfall went negative on {}", row.date);
            assert!(row.wind_speed >= WIND_SPEED_MIN && row.wind_speed < WIND_SPEED_MAX);
        }
    }

    #[test]
    fn test_calendar_features() {
        let row = DailyWeather {
            date: date(2025, 4, 13),
            temperature: 20.0,
            rainfall: 0.0,
            humidity: 60.0,
            wind_speed: 5.0,
        };
        assert_eq!(row.day_of_year(), 103);
        assert_eq!(row.month(), 4);
        assert_eq!(row.year(), 2025);
        assert_eq!(row.features(), [103.0, 4.0, 2025.0, 5.0]);
    }
}
