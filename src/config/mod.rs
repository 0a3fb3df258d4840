//! Configuration module for authorship analysis
//!
//! This module handles:
//! - Project-level configuration (authorship.toml / .authorshiprc.json)
//! - Line model and language selection
//! - Indicator overrides

mod analyzer_config;

pub use analyzer_config::{
    AnalysisConfig,
    AnalyzerConfig,
    CONFIG_FILE_NAMES,
    IndicatorOverride,
    VectorizerConfig,
    load_config,
    load_config_file,
};
