//! Per-output regression metrics
//!
//! Mirrors the demo's "raw values" reporting: every target column gets its
//! own mean squared error and coefficient of determination, no averaging
//! across outputs.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::dataset::{N_OUTPUTS, OUTPUT_NAMES};
use crate::error::SkycastError;

/// Metrics for one target column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetrics {
    /// Output name, e.g. "Temperature"
    pub output: String,
    /// Mean squared error
    pub mse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(SkycastError::validation("metric input is empty"));
    }
    if actual.len() != predicted.len() {
        return Err(SkycastError::validation(format!(
            "actual ({}) and predicted ({}) lengths do not match",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

/// Mean squared error
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Coefficient of determination (R²).
///
/// When the actual values have zero variance, returns 1 for a perfect
/// prediction and 0 otherwise.
pub fn r2(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean) * (a - mean)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Compute [`OutputMetrics`] for every target column.
pub fn evaluate(
    actual: &[[f64; N_OUTPUTS]],
    predicted: &[[f64; N_OUTPUTS]],
) -> Result<Vec<OutputMetrics>> {
    if actual.len() != predicted.len() {
        return Err(SkycastError::validation(format!(
            "actual ({}) and predicted ({}) row counts do not match",
            actual.len(),
            predicted.len()
        )));
    }

    let mut report = Vec::with_capacity(N_OUTPUTS);
    for (k, output) in OUTPUT_NAMES.iter().enumerate() {
        let actual_col: Vec<f64> = actual.iter().map(|row| row[k]).collect();
        let predicted_col: Vec<f64> = predicted.iter().map(|row| row[k]).collect();
        report.push(OutputMetrics {
            output: (*output).to_string(),
            mse: mse(&actual_col, &predicted_col)?,
            r2: r2(&actual_col, &predicted_col)?,
        });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_of_identical_sequences_is_zero() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(mse(&values, &values).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_known_value() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 5.0];
        // (1 + 0 + 4) / 3
        assert!((mse(&actual, &predicted).unwrap() - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_perfect_prediction_is_one() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(r2(&values, &values).unwrap(), 1.0);
    }

    #[test]
    fn test_r2_mean_prediction_is_zero() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        assert!((r2(&actual, &predicted).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_r2_zero_variance_convention() {
        let flat = [5.0, 5.0, 5.0];
        assert_eq!(r2(&flat, &flat).unwrap(), 1.0);
        assert_eq!(r2(&flat, &[5.0, 6.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        assert!(mse(&[1.0], &[1.0, 2.0]).is_err());
        assert!(r2(&[1.0, 2.0], &[1.0]).is_err());
        assert!(mse(&[], &[]).is_err());
    }

    #[test]
    fn test_evaluate_reports_every_output() {
        let actual = vec![[20.0, 1.0, 60.0], [22.0, 0.0, 65.0]];
        let report = evaluate(&actual, &actual).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].output, "Temperature");
        assert_eq!(report[1].output, "Rainfall");
        assert_eq!(report[2].output, "Humidity");
        for metrics in &report {
            assert_eq!(metrics.mse, 0.0);
            assert_eq!(metrics.r2, 1.0);
        }
    }
}
