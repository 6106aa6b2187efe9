use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skycast::config::SkycastConfig;
use skycast::dataset::Dataset;
use skycast::{RandomForest, forecast_for, metrics, plot, train_test_split};

struct Args {
    config_path: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        config_path: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    parsed.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--verbose" => parsed.verbose = true,
            "--help" | "-h" => {
                println!("skycast {}", skycast::VERSION);
                println!("Synthetic daily-weather dataset and random-forest forecast demo");
                println!();
                println!("Usage: skycast [--config <path>] [--verbose]");
                return None;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Usage: skycast [--config <path>] [--verbose]");
                return None;
            }
        }
        i += 1;
    }

    Some(parsed)
}

fn init_logging(config: &SkycastConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let Some(args) = parse_args() else {
        return Ok(());
    };

    let config = SkycastConfig::load_from_path(args.config_path)
        .with_context(|| "Failed to load configuration")?;
    init_logging(&config, args.verbose);

    info!(version = skycast::VERSION, "starting skycast demo");

    // Generate the synthetic dataset and the feature/target matrices
    let dataset = Dataset::generate(
        config.dataset.start_date,
        config.dataset.end_date,
        config.dataset.seed,
    )?;
    info!(
        rows = dataset.len(),
        start = %config.dataset.start_date,
        end = %config.dataset.end_date,
        "generated synthetic dataset"
    );
    let features = dataset.feature_matrix();
    let targets = dataset.target_matrix();

    // Split, train, evaluate
    let split = train_test_split(dataset.len(), config.split.test_fraction, config.split.seed)?;
    let train_features: Vec<_> = split.train.iter().map(|&i| features[i]).collect();
    let train_targets: Vec<_> = split.train.iter().map(|&i| targets[i]).collect();
    let test_features: Vec<_> = split.test.iter().map(|&i| features[i]).collect();
    let test_targets: Vec<_> = split.test.iter().map(|&i| targets[i]).collect();
    info!(
        train_rows = train_features.len(),
        test_rows = test_features.len(),
        "split dataset"
    );

    let model = RandomForest::fit(config.model.clone(), &train_features, &train_targets)?;
    info!(trees = config.model.n_trees, "trained random forest");

    let predicted = model.predict_batch(&test_features);
    let report = metrics::evaluate(&test_targets, &predicted)?;

    println!("How Good Are the Predictions?");
    for output_metrics in &report {
        println!(
            "{}: Error = {:.2}, Accuracy = {:.2}",
            output_metrics.output, output_metrics.mse, output_metrics.r2
        );
    }

    // One forecast, printed the way the metrics report is: for humans
    println!();
    println!("Weather Forecast for {}:", config.output.forecast_date);
    match forecast_for(
        &model,
        &config.output.forecast_date,
        config.output.forecast_wind_speed,
    ) {
        Ok(forecast) => println!("{}", serde_json::to_string_pretty(&forecast)?),
        Err(err) => println!("{}", err.user_message()),
    }

    // Chart of the first test-set days: actual vs predicted temperature
    let actual_temperature: Vec<f64> = test_targets.iter().map(|row| row[0]).collect();
    let predicted_temperature: Vec<f64> = predicted.iter().map(|row| row[0]).collect();
    plot::plot_temperature(
        &actual_temperature,
        &predicted_temperature,
        &config.output.plot_path,
    )?;
    println!();
    println!("Plot saved to '{}'.", config.output.plot_path);

    model.save(&config.output.model_path)?;
    println!(
        "Model saved as '{}'. To be reused later!",
        config.output.model_path
    );

    Ok(())
}
