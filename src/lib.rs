//! Authorship - AI-generated vs human-written code detection
//!
//! Classifies source text with an ensemble of independent classifiers,
//! breaks the verdict down line by line (reconciled against the file
//! verdict), and explains it with structural and lexical evidence.
//!
//! ```no_run
//! use authorship::{Analyzer, ModelPool};
//!
//! let config = authorship::load_config(std::path::Path::new("."));
//! let pool = ModelPool::new(); // register trained classifiers here
//! let analyzer = Analyzer::with_vectorizer(pool, &config)?;
//! let report = analyzer.analyze("def add(a, b):\n    return a + b\n")?;
//! println!("{} ({:.2})", report.prediction, report.confidence);
//! # Ok::<(), authorship::Error>(())
//! ```

pub mod analyzer;
pub mod characteristics;
pub mod classifier;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod lines;
pub mod models;
pub mod patterns;

pub use analyzer::Analyzer;
pub use characteristics::CharacteristicSummarizer;
pub use classifier::{
    Classifier, FeatureExtractor, Features, GbdtClassifier, HashingVectorizer, Language,
    ModelPool, Prediction,
};
pub use config::{load_config, load_config_file, AnalyzerConfig};
pub use error::{Error, Result};
pub use models::{
    AnalysisReport, CharacteristicsReport, FileAnalysis, Label, LineAnalysis, ModelId,
    ModelResult, RepositoryReport, Verdict,
};
pub use patterns::LinePattern;
