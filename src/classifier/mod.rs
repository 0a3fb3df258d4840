//! Classifier pool for authorship detection
//!
//! Every classifier shares one feature space and answers
//! `predict(features) -> (label, confidence)`. The pool owns them behind a
//! closed set of `ModelId`s and never assumes they agree or are equally
//! calibrated.
//!
//! Architecture: text → FeatureExtractor → every model in the pool → vote

pub mod features;
pub mod gbdt_model;

pub use features::{FeatureExtractor, Features, HashingVectorizer, Language};
pub use gbdt_model::GbdtClassifier;

use crate::error::{Error, Result};
use crate::models::{Label, ModelId, ModelResult};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One classifier's answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Probability the classifier assigns to `label`
    pub confidence: f64,
}

/// A trained binary classifier.
///
/// Must be safe to call from several analyses at once.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &Features) -> Result<Prediction>;
}

/// Named collection of independent classifiers
#[derive(Default)]
pub struct ModelPool {
    models: BTreeMap<ModelId, Box<dyn Classifier>>,
}

impl ModelPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a classifier, replacing any previous one under the same id
    pub fn with_model(mut self, id: ModelId, classifier: impl Classifier + 'static) -> Self {
        self.insert(id, Box::new(classifier));
        self
    }

    pub fn insert(&mut self, id: ModelId, classifier: Box<dyn Classifier>) {
        if self.models.insert(id, classifier).is_some() {
            debug!("Replaced classifier {}", id.as_str());
        }
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Run a single model. `None` when the model is not in the pool.
    pub fn predict(&self, id: ModelId, features: &Features) -> Option<Result<ModelResult>> {
        let classifier = self.models.get(&id)?;
        Some(run_classifier(id, classifier.as_ref(), features))
    }

    /// Run every model, dropping the ones that fail
    pub fn predict_all(&self, features: &Features) -> Vec<ModelResult> {
        self.models
            .iter()
            .filter_map(|(&id, classifier)| {
                match run_classifier(id, classifier.as_ref(), features) {
                    Ok(result) => {
                        debug!(
                            "{}: {} ({:.3})",
                            id, result.prediction, result.confidence
                        );
                        Some(result)
                    }
                    Err(e) => {
                        warn!("Dropping {} from the vote: {}", id, e);
                        None
                    }
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for ModelPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPool")
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Run one classifier and reject output outside the binary contract
fn run_classifier(id: ModelId, classifier: &dyn Classifier, features: &Features) -> Result<ModelResult> {
    let prediction = classifier.predict(features)?;

    if prediction.label == Label::Unknown {
        return Err(Error::Prediction {
            model: id,
            message: "classifier returned no label".into(),
        });
    }
    if !prediction.confidence.is_finite() || !(0.0..=1.0).contains(&prediction.confidence) {
        return Err(Error::Prediction {
            model: id,
            message: format!("confidence {} outside [0, 1]", prediction.confidence),
        });
    }

    Ok(ModelResult {
        name: id,
        prediction: prediction.label,
        confidence: prediction.confidence,
    })
}
