//! Real-vs-predicted temperature chart

use plotters::prelude::*;
use std::path::Path;

use crate::Result;
use crate::error::SkycastError;

/// How many test-set days the chart shows
pub const PLOT_DAYS: usize = 30;

fn plot_err(e: impl std::fmt::Display) -> SkycastError {
    SkycastError::plot(e.to_string())
}

/// Render the first [`PLOT_DAYS`] actual and predicted temperatures as a
/// line chart with point markers and write it to `path` as a PNG.
pub fn plot_temperature(
    actual: &[f64],
    predicted: &[f64],
    path: impl AsRef<Path>,
) -> Result<()> {
    if actual.is_empty() {
        return Err(SkycastError::validation("nothing to plot"));
    }
    if actual.len() != predicted.len() {
        return Err(SkycastError::validation(format!(
            "actual ({}) and predicted ({}) series lengths do not match",
            actual.len(),
            predicted.len()
        )));
    }

    let actual = &actual[..actual.len().min(PLOT_DAYS)];
    let predicted = &predicted[..predicted.len().min(PLOT_DAYS)];

    // Axis ranges with a little vertical padding
    let (min_temp, max_temp) = actual.iter().chain(predicted).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), &t| (min.min(t), max.max(t)),
    );
    let y_padding = if (max_temp - min_temp).abs() > 1e-6 {
        (max_temp - min_temp) * 0.1
    } else {
        1.0
    };
    let x_end = actual.len().saturating_sub(1).max(1) as f64;

    let root = BitMapBackend::new(path.as_ref(), (800, 400)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Real vs Predicted Temperature", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_end, (min_temp - y_padding)..(max_temp + y_padding))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Days")
        .y_desc("Temperature (°C)")
        .light_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            actual.iter().enumerate().map(|(i, &t)| (i as f64, t)),
            BLUE,
        ))
        .map_err(plot_err)?
        .label("Real Temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(
            actual
                .iter()
                .enumerate()
                .map(|(i, &t)| Circle::new((i as f64, t), 3, BLUE.filled())),
        )
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            predicted.iter().enumerate().map(|(i, &t)| (i as f64, t)),
            RED,
        ))
        .map_err(plot_err)?
        .label("Predicted Temperature")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .draw_series(
            predicted
                .iter()
                .enumerate()
                .map(|(i, &t)| Cross::new((i as f64, t), 3, RED)),
        )
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
