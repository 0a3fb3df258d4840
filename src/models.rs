//! Core data models for authorship analysis
//!
//! These are plain value objects: every analysis call builds its own and
//! hands ownership to the caller. Nothing here is cached or shared.

use crate::error::Error;
use crate::patterns::LinePattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Authorship label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ai,
    Human,
    /// Only produced by a vote over zero models
    #[default]
    Unknown,
}

impl Label {
    /// The other side of a binary verdict. `Unknown` has no opposite.
    pub fn opposite(self) -> Option<Label> {
        match self {
            Label::Ai => Some(Label::Human),
            Label::Human => Some(Label::Ai),
            Label::Unknown => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Ai => write!(f, "ai"),
            Label::Human => write!(f, "human"),
            Label::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identifier of a classifier in the model pool.
///
/// Declaration order is the pool's iteration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    Logistic,
    RandomForest,
    #[default]
    GradientBoost,
    #[serde(rename = "xgboost")]
    XgBoost,
}

impl ModelId {
    pub const ALL: [ModelId; 4] = [
        ModelId::Logistic,
        ModelId::RandomForest,
        ModelId::GradientBoost,
        ModelId::XgBoost,
    ];

    /// Config/wire identifier (`gradient_boost`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Logistic => "logistic",
            ModelId::RandomForest => "random_forest",
            ModelId::GradientBoost => "gradient_boost",
            ModelId::XgBoost => "xgboost",
        }
    }
}

/// Human-facing name (`Gradient Boost`)
impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelId::Logistic => write!(f, "Logistic"),
            ModelId::RandomForest => write!(f, "Random Forest"),
            ModelId::GradientBoost => write!(f, "Gradient Boost"),
            ModelId::XgBoost => write!(f, "Xgboost"),
        }
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "logistic" => Ok(ModelId::Logistic),
            "random_forest" | "randomforest" => Ok(ModelId::RandomForest),
            "gradient_boost" | "gradientboost" => Ok(ModelId::GradientBoost),
            "xgboost" | "xg_boost" => Ok(ModelId::XgBoost),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}

/// Output of one classifier on one input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub name: ModelId,
    pub prediction: Label,
    /// The classifier's own estimate, not calibrated against other models
    pub confidence: f64,
}

/// Ensemble verdict for a whole file or snippet.
///
/// `confidence` is a consensus strength: the winning side's summed
/// confidence divided by the number of voting models. It equals the mean
/// confidence only for a unanimous vote and should not be read as a
/// calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,
    pub confidence: f64,
}

impl Verdict {
    pub fn unknown() -> Self {
        Self {
            label: Label::Unknown,
            confidence: 0.0,
        }
    }
}

/// Result for one non-blank source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnalysis {
    /// 1-based position in the original, unfiltered text
    pub line_number: usize,
    pub content: String,
    pub prediction: Label,
    pub confidence: f64,
    pub patterns: Vec<LinePattern>,
}

/// Simple structural metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMetrics {
    /// Mean character length of non-blank lines
    pub avg_line_length: f64,
    pub empty_line_ratio: f64,
    pub comment_ratio: f64,
}

/// Distribution of line verdicts after reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub total: usize,
    pub ai_lines: usize,
    pub human_lines: usize,
    /// AI lines above the high-confidence cutoff
    pub high_confidence_ai: usize,
    /// Human lines above the high-confidence cutoff
    pub high_confidence_human: usize,
}

impl LineBreakdown {
    pub fn ai_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.ai_lines as f64 / self.total as f64 * 100.0
    }
}

/// Evidence lists and metrics explaining a verdict
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicsReport {
    pub ai_characteristics: Vec<String>,
    pub human_characteristics: Vec<String>,
    pub metrics: CodeMetrics,
    pub ai_pattern_counts: BTreeMap<String, usize>,
    pub human_pattern_counts: BTreeMap<String, usize>,
    pub lines: LineBreakdown,
}

/// Probability view of the verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilitySummary {
    pub ai_probability: f64,
    pub human_probability: f64,
}

impl ProbabilitySummary {
    pub fn from_verdict(verdict: &Verdict) -> Self {
        match verdict.label {
            Label::Ai => Self {
                ai_probability: verdict.confidence,
                human_probability: 1.0 - verdict.confidence,
            },
            Label::Human => Self {
                ai_probability: 1.0 - verdict.confidence,
                human_probability: verdict.confidence,
            },
            Label::Unknown => Self::default(),
        }
    }
}

/// Full analysis of one snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub prediction: Label,
    pub confidence: f64,
    pub is_ai: bool,
    pub summary: ProbabilitySummary,
    pub detailed_results: Vec<ModelResult>,
    pub line_analyses: Vec<LineAnalysis>,
    pub characteristics: CharacteristicsReport,
}

/// Per-file result of a multi-file analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub prediction: Label,
    pub confidence: f64,
    /// Non-blank lines in the file
    pub line_count: usize,
    pub ai_lines: usize,
    pub human_lines: usize,
    pub model_results: Vec<ModelResult>,
}

/// Overall makeup of a set of files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    PredominantlyAi,
    PredominantlyHuman,
    Mixed,
}

/// Share of files above which a set is called predominantly one side
const PREDOMINANT_SHARE: f64 = 0.7;

/// Aggregate over a set of analyzed files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryReport {
    /// Sorted by confidence, highest first
    pub files: Vec<FileAnalysis>,
    pub total_files: usize,
    pub ai_files: usize,
    /// Every file not voted AI
    pub human_files: usize,
    pub average_confidence: f64,
    pub total_lines: usize,
    pub ai_lines: usize,
    pub human_lines: usize,
    pub composition: Composition,
}

impl RepositoryReport {
    pub fn from_files(mut files: Vec<FileAnalysis>) -> Self {
        files.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let total_files = files.len();
        let ai_files = files.iter().filter(|f| f.prediction == Label::Ai).count();
        let human_files = total_files - ai_files;

        let average_confidence = if total_files > 0 {
            files.iter().map(|f| f.confidence).sum::<f64>() / total_files as f64
        } else {
            0.0
        };

        let composition = if total_files == 0 {
            Composition::Mixed
        } else if ai_files as f64 / total_files as f64 > PREDOMINANT_SHARE {
            Composition::PredominantlyAi
        } else if human_files as f64 / total_files as f64 > PREDOMINANT_SHARE {
            Composition::PredominantlyHuman
        } else {
            Composition::Mixed
        };

        Self {
            total_lines: files.iter().map(|f| f.line_count).sum(),
            ai_lines: files.iter().map(|f| f.ai_lines).sum(),
            human_lines: files.iter().map(|f| f.human_lines).sum(),
            files,
            total_files,
            ai_files,
            human_files,
            average_confidence,
            composition,
        }
    }
}
