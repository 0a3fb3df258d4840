//! Error types for authorship analysis

use crate::models::ModelId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building an analyzer or running an analysis
#[derive(Error, Debug)]
pub enum Error {
    #[error("No code provided")]
    EmptyInput,

    #[error("Feature extraction failed: {0}")]
    Feature(String),

    #[error("Model {model} failed to predict: {message}")]
    Prediction { model: ModelId, message: String },

    #[error("Invalid pattern for indicator '{name}': {source}")]
    InvalidIndicator {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown model '{0}'. Valid models: logistic, random_forest, gradient_boost, xgboost")]
    UnknownModel(String),

    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
