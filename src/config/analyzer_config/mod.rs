//! Analyzer configuration support
//!
//! Loads per-project configuration from `authorship.toml` or
//! `.authorshiprc.json` in a project directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # authorship.toml
//!
//! [analysis]
//! line_model = "gradient_boost"
//! language = "python"          # python | java | javascript
//!
//! [vectorizer]
//! dimensions = 5000
//! ngram_min = 3                # defaults to the language's range
//! ngram_max = 5
//! lowercase = true
//!
//! [indicators.verbose-comments]
//! threshold = 4
//!
//! [indicators.debug_prints]
//! pattern = 'console\.log'
//! label = "Console logging"
//!
//! [indicators.overly_structured]
//! enabled = false
//! ```

use crate::characteristics::{CharacteristicSummarizer, IndicatorTable};
use crate::classifier::{HashingVectorizer, Language, features::DEFAULT_DIMENSIONS};
use crate::error::{Error, Result};
use crate::models::ModelId;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: &[&str] = &["authorship.toml", ".authorshiprc.json"];

/// Top-level analyzer configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub vectorizer: VectorizerConfig,

    /// Per-indicator overrides, keyed by indicator name
    #[serde(default)]
    pub indicators: HashMap<String, IndicatorOverride>,
}

/// `[analysis]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Model used for per-line analysis
    #[serde(default)]
    pub line_model: ModelId,

    /// Source language (comment marker and n-gram range)
    #[serde(default)]
    pub language: Language,
}

/// `[vectorizer]` section
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerConfig {
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Overrides the language's lower n-gram bound
    #[serde(default)]
    pub ngram_min: Option<usize>,

    /// Overrides the language's upper n-gram bound
    #[serde(default)]
    pub ngram_max: Option<usize>,

    #[serde(default = "default_true")]
    pub lowercase: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
            ngram_min: None,
            ngram_max: None,
            lowercase: true,
        }
    }
}

fn default_dimensions() -> usize {
    DEFAULT_DIMENSIONS
}

fn default_true() -> bool {
    true
}

/// `[indicators.<name>]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndicatorOverride {
    /// `false` removes the indicator entirely
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Evidence is produced when the count exceeds this
    #[serde(default)]
    pub threshold: Option<usize>,

    /// Replacement line regex
    #[serde(default)]
    pub pattern: Option<String>,

    /// Replacement evidence label
    #[serde(default)]
    pub label: Option<String>,
}

impl AnalyzerConfig {
    /// Vectorizer for the configured language and overrides
    pub fn build_vectorizer(&self) -> HashingVectorizer {
        let (lang_min, lang_max) = self.analysis.language.ngram_range();
        let ngram_min = self.vectorizer.ngram_min.unwrap_or(lang_min);
        let ngram_max = self.vectorizer.ngram_max.unwrap_or(lang_max);

        if ngram_max < ngram_min {
            warn!(
                "vectorizer.ngram_max ({}) is below ngram_min ({}), using {}",
                ngram_max, ngram_min, ngram_min
            );
        }

        HashingVectorizer::new(
            ngram_min,
            ngram_max,
            self.vectorizer.dimensions,
            self.vectorizer.lowercase,
        )
    }

    /// Built-in indicators with the configured overrides applied
    pub fn indicator_table(&self) -> Result<IndicatorTable> {
        IndicatorTable::with_overrides(&self.indicators)
    }

    pub fn build_summarizer(&self) -> Result<CharacteristicSummarizer> {
        Ok(CharacteristicSummarizer::new(
            self.indicator_table()?,
            self.analysis.language,
        ))
    }
}

/// Load analyzer configuration from a project directory.
///
/// Searches for `authorship.toml`, then `.authorshiprc.json`. A file that
/// fails to parse is skipped with a warning. Returns defaults when nothing
/// usable is found.
pub fn load_config(dir: &Path) -> AnalyzerConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(config) => {
                debug!("Loaded analyzer config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No analyzer config found, using defaults");
    AnalyzerConfig::default()
}

/// Load one config file, failing on any read or parse error.
///
/// `.json` files are parsed as JSON, everything else as TOML.
pub fn load_config_file(path: &Path) -> Result<AnalyzerConfig> {
    read_config(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

fn read_config(path: &Path) -> anyhow::Result<AnalyzerConfig> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        load_json_config(path)
    } else {
        load_toml_config(path)
    }
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<AnalyzerConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AnalyzerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<AnalyzerConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AnalyzerConfig = serde_json::from_str(&content)?;
    Ok(config)
}
