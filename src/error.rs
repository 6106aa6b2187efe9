//! Error types and handling for the `Skycast` demo

use thiserror::Error;

/// Fixed guidance returned when the forecast date cannot be parsed.
pub const DATE_FORMAT_HINT: &str = "Oops! Use date format YYYY-MM-DD, like 2025-04-13.";

/// Main error type for the `Skycast` demo
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Dataset generation errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Model training or prediction errors
    #[error("Model error: {message}")]
    Model { message: String },

    /// Chart rendering errors
    #[error("Plot error: {message}")]
    Plot { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Model artifact encoding/decoding errors
    #[error("Codec error: {source}")]
    Codec {
        #[from]
        source: postcard::Error,
    },
}

impl SkycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(message: S) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Create a new plot error
    pub fn plot<S: Into<String>>(message: S) -> Self {
        Self::Plot {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkycastError::Validation { message } => message.clone(),
            SkycastError::Dataset { message } => {
                format!("Could not generate the dataset: {message}")
            }
            SkycastError::Model { message } => {
                format!("Model operation failed: {message}")
            }
            SkycastError::Plot { .. } => {
                "Chart rendering failed. Please check the output path.".to_string()
            }
            SkycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            SkycastError::Codec { .. } => {
                "Model file is corrupt or was written by an incompatible version.".to_string()
            }
        }
    }
}
