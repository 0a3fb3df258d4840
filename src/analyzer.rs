//! Analysis entry points
//!
//! An `Analyzer` owns the model pool, the feature extractor and the
//! characteristic summarizer. All three are read-only after construction,
//! so one analyzer can serve concurrent requests.
//!
//! Pipeline: classify (every model → vote) → line analysis with the line
//! model, reconciled against the verdict → characteristic summary.

use crate::characteristics::{line_breakdown, CharacteristicSummarizer};
use crate::classifier::{FeatureExtractor, ModelPool};
use crate::config::AnalyzerConfig;
use crate::ensemble;
use crate::error::{Error, Result};
use crate::lines;
use crate::models::{
    AnalysisReport, CharacteristicsReport, FileAnalysis, Label, LineAnalysis, ModelId,
    ModelResult, ProbabilitySummary, RepositoryReport, Verdict,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct Analyzer {
    pool: ModelPool,
    extractor: Option<Box<dyn FeatureExtractor>>,
    summarizer: CharacteristicSummarizer,
    line_model: ModelId,
}

impl Analyzer {
    /// Build an analyzer from its parts.
    ///
    /// Fails only when the configured indicator overrides do not compile.
    /// An empty pool or a missing extractor is allowed and yields `unknown`
    /// verdicts.
    pub fn new(
        pool: ModelPool,
        extractor: Option<Box<dyn FeatureExtractor>>,
        config: &AnalyzerConfig,
    ) -> Result<Self> {
        let line_model = config.analysis.line_model;
        if !pool.is_empty() && !pool.contains(line_model) {
            warn!(
                "Line model {} is not in the pool; line analysis will be empty",
                line_model.as_str()
            );
        }

        Ok(Self {
            pool,
            extractor,
            summarizer: config.build_summarizer()?,
            line_model,
        })
    }

    /// Analyzer using the configured hashing vectorizer as extractor
    pub fn with_vectorizer(pool: ModelPool, config: &AnalyzerConfig) -> Result<Self> {
        let vectorizer = config.build_vectorizer();
        Self::new(pool, Some(Box::new(vectorizer)), config)
    }

    pub fn pool(&self) -> &ModelPool {
        &self.pool
    }

    pub fn line_model(&self) -> ModelId {
        self.line_model
    }

    /// Run every model on the whole text and vote.
    ///
    /// No models, no extractor or a failed extraction gives an empty result
    /// list and an `unknown` verdict.
    pub fn classify(&self, code: &str) -> (Vec<ModelResult>, Verdict) {
        let Some(extractor) = self.extractor.as_deref() else {
            warn!("No feature extractor configured");
            return (Vec::new(), Verdict::unknown());
        };
        if self.pool.is_empty() {
            warn!("Model pool is empty");
            return (Vec::new(), Verdict::unknown());
        }

        let features = match extractor.extract(code) {
            Ok(features) => features,
            Err(e) => {
                warn!("Feature extraction failed: {}", e);
                return (Vec::new(), Verdict::unknown());
            }
        };

        let results = self.pool.predict_all(&features);
        let verdict = ensemble::vote(&results);
        (results, verdict)
    }

    /// Line analysis with the configured line model
    pub fn analyze_lines(&self, code: &str, overall: Label) -> Vec<LineAnalysis> {
        self.analyze_lines_with(code, self.line_model, overall)
    }

    /// Line analysis with an explicit model
    pub fn analyze_lines_with(&self, code: &str, model: ModelId, overall: Label) -> Vec<LineAnalysis> {
        match self.extractor.as_deref() {
            Some(extractor) => lines::analyze_lines(&self.pool, extractor, code, model, overall),
            None => Vec::new(),
        }
    }

    pub fn summarize(&self, code: &str, line_analyses: &[LineAnalysis]) -> CharacteristicsReport {
        self.summarizer.summarize(code, line_analyses)
    }

    /// Full analysis of one snippet
    pub fn analyze(&self, code: &str) -> Result<AnalysisReport> {
        self.analyze_with_line_model(code, self.line_model)
    }

    /// Full analysis using `line_model` for the line breakdown
    pub fn analyze_with_line_model(&self, code: &str, line_model: ModelId) -> Result<AnalysisReport> {
        if code.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let (detailed_results, verdict) = self.classify(code);
        let line_analyses = self.analyze_lines_with(code, line_model, verdict.label);
        let characteristics = self.summarize(code, &line_analyses);

        info!(
            "Verdict: {} ({:.2}) from {} models, {} lines analyzed",
            verdict.label,
            verdict.confidence,
            detailed_results.len(),
            line_analyses.len()
        );

        Ok(AnalysisReport {
            prediction: verdict.label,
            confidence: verdict.confidence,
            is_ai: verdict.label == Label::Ai,
            summary: ProbabilitySummary::from_verdict(&verdict),
            detailed_results,
            line_analyses,
            characteristics,
        })
    }

    /// Verdict and line counts for one file. Skips the characteristic summary.
    pub fn analyze_file(&self, path: &Path, code: &str) -> Result<FileAnalysis> {
        if code.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let (model_results, verdict) = self.classify(code);
        let line_analyses = self.analyze_lines(code, verdict.label);
        let breakdown = line_breakdown(&line_analyses);

        Ok(FileAnalysis {
            path: path.to_path_buf(),
            prediction: verdict.label,
            confidence: verdict.confidence,
            line_count: lines::numbered_lines(code).count(),
            ai_lines: breakdown.ai_lines,
            human_lines: breakdown.human_lines,
            model_results,
        })
    }

    /// Analyze many files in parallel. Blank files are skipped.
    pub fn analyze_files(&self, files: &[(PathBuf, String)]) -> RepositoryReport {
        let analyses: Vec<FileAnalysis> = files
            .par_iter()
            .filter_map(|(path, code)| match self.analyze_file(path, code) {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    debug!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        let report = RepositoryReport::from_files(analyses);
        info!(
            "Analyzed {} files: {} ai, {} human",
            report.total_files, report.ai_files, report.human_files
        );
        report
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("pool", &self.pool)
            .field("has_extractor", &self.extractor.is_some())
            .field("line_model", &self.line_model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::{BrokenClassifier, FixedClassifier};
    use crate::classifier::HashingVectorizer;

    fn analyzer(pool: ModelPool) -> Analyzer {
        let config = AnalyzerConfig::default();
        Analyzer::new(pool, Some(Box::new(HashingVectorizer::new(2, 3, 64, true))), &config)
            .expect("default config builds")
    }

    fn ai_pool() -> ModelPool {
        ModelPool::new()
            .with_model(ModelId::Logistic, FixedClassifier(Label::Ai, 0.9))
            .with_model(ModelId::RandomForest, FixedClassifier(Label::Ai, 0.7))
            .with_model(ModelId::GradientBoost, FixedClassifier(Label::Ai, 0.8))
    }

    const CODE: &str = "def add(a, b):\n    return a + b\n\nprint(add(1, 2))\n";

    #[test]
    fn test_empty_input_is_rejected() {
        let analyzer = analyzer(ai_pool());
        assert!(matches!(analyzer.analyze(""), Err(Error::EmptyInput)));
        assert!(matches!(analyzer.analyze(" \n\t"), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_unanimous_ai() {
        let report = analyzer(ai_pool()).analyze(CODE).unwrap();
        assert_eq!(report.prediction, Label::Ai);
        assert!(report.is_ai);
        assert!((report.confidence - 0.8).abs() < 1e-12);
        assert!((report.summary.ai_probability - 0.8).abs() < 1e-12);
        assert!((report.summary.human_probability - 0.2).abs() < 1e-12);
        assert_eq!(report.detailed_results.len(), 3);

        // three non-blank lines, all from the gradient_boost stub
        let numbers: Vec<usize> = report.line_analyses.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 4]);
        assert_eq!(report.characteristics.lines.ai_lines, 3);
    }

    #[test]
    fn test_empty_pool_degrades_to_unknown() {
        let report = analyzer(ModelPool::new()).analyze(CODE).unwrap();
        assert_eq!(report.prediction, Label::Unknown);
        assert_eq!(report.confidence, 0.0);
        assert!(!report.is_ai);
        assert_eq!(report.summary, ProbabilitySummary::default());
        assert!(report.detailed_results.is_empty());
        assert!(report.line_analyses.is_empty());
    }

    #[test]
    fn test_missing_extractor_degrades_to_unknown() {
        let analyzer = Analyzer::new(ai_pool(), None, &AnalyzerConfig::default()).unwrap();
        let report = analyzer.analyze(CODE).unwrap();
        assert_eq!(report.prediction, Label::Unknown);
        assert!(report.detailed_results.is_empty());
        assert!(report.line_analyses.is_empty());
    }

    #[test]
    fn test_failing_model_shrinks_results() {
        let pool = ai_pool().with_model(ModelId::XgBoost, BrokenClassifier);
        let report = analyzer(pool).analyze(CODE).unwrap();
        assert_eq!(report.detailed_results.len(), 3);
        assert!(report.detailed_results.iter().all(|r| r.name != ModelId::XgBoost));
    }

    #[test]
    fn test_line_model_override() {
        let analyzer = analyzer(ai_pool());
        let report = analyzer.analyze_with_line_model(CODE, ModelId::XgBoost).unwrap();
        assert_eq!(report.prediction, Label::Ai);
        assert!(report.line_analyses.is_empty());

        let report = analyzer.analyze_with_line_model(CODE, ModelId::Logistic).unwrap();
        assert!(report.line_analyses.iter().all(|l| (l.confidence - 0.9).abs() < 1e-12));
    }

    #[test]
    fn test_configured_line_model() {
        let mut config = AnalyzerConfig::default();
        config.analysis.line_model = ModelId::RandomForest;
        let analyzer = Analyzer::with_vectorizer(ai_pool(), &config).unwrap();
        assert_eq!(analyzer.line_model(), ModelId::RandomForest);

        let lines = analyzer.analyze_lines(CODE, Label::Ai);
        assert!(lines.iter().all(|l| (l.confidence - 0.7).abs() < 1e-12));
    }

    #[test]
    fn test_analyze_file_counts() {
        let analysis = analyzer(ai_pool())
            .analyze_file(Path::new("src/add.py"), CODE)
            .unwrap();
        assert_eq!(analysis.path, PathBuf::from("src/add.py"));
        assert_eq!(analysis.prediction, Label::Ai);
        assert_eq!(analysis.line_count, 3);
        assert_eq!(analysis.ai_lines, 3);
        assert_eq!(analysis.human_lines, 0);
        assert_eq!(analysis.model_results.len(), 3);
    }

    #[test]
    fn test_analyze_files_skips_blank_files() {
        let files = vec![
            (PathBuf::from("a.py"), CODE.to_string()),
            (PathBuf::from("empty.py"), "\n\n".to_string()),
            (PathBuf::from("b.py"), "x = 1\n".to_string()),
        ];
        let report = analyzer(ai_pool()).analyze_files(&files);
        assert_eq!(report.total_files, 2);
        assert_eq!(report.ai_files, 2);
        assert_eq!(report.total_lines, 4);
        assert!(report.files.iter().all(|f| f.path != PathBuf::from("empty.py")));
    }
}
