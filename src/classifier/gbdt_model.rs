//! GBDT model adapter for authorship classification
//!
//! Wraps an in-memory `gbdt` model so it can sit in a `ModelPool`. The
//! model is expected to be a binary `LogLikelyhood` booster whose positive
//! class (label 1.0) is "ai".
//!
//! Note: the gbdt crate works in `f32` (`ValueType`); probabilities are
//! widened to `f64` at the crate boundary.

use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;

use super::features::Features;
use super::{Classifier, Prediction};
use crate::error::{Error, Result};
use crate::models::{Label, ModelId};

/// Gradient-boosted tree classifier
pub struct GbdtClassifier {
    model: GBDT,
    id: ModelId,
}

impl GbdtClassifier {
    /// Wrap an already-trained `GBDT` instance.
    ///
    /// `id` is only used to attribute errors.
    pub fn from_trained(model: GBDT, id: ModelId) -> Self {
        Self { model, id }
    }

    /// Build from a serialized model held in memory (gbdt-rs native JSON).
    pub fn from_json(json: &str, id: ModelId) -> Result<Self> {
        let model: GBDT = serde_json::from_str(json).map_err(|e| Error::Prediction {
            model: id,
            message: format!("failed to parse GBDT JSON: {e}"),
        })?;
        Ok(Self { model, id })
    }

    /// Probability of the "ai" class
    pub fn ai_probability(&self, features: &Features) -> Result<f64> {
        let data = vec![Data::new_test_data(features.values.clone(), None)];
        let preds = self.model.predict(&data);
        preds.first().map(|&p| p as f64).ok_or_else(|| Error::Prediction {
            model: self.id,
            message: "model produced no output".into(),
        })
    }
}

impl Classifier for GbdtClassifier {
    fn predict(&self, features: &Features) -> Result<Prediction> {
        let ai_prob = self.ai_probability(features)?;
        let prediction = if ai_prob >= 0.5 {
            Prediction {
                label: Label::Ai,
                confidence: ai_prob,
            }
        } else {
            Prediction {
                label: Label::Human,
                confidence: 1.0 - ai_prob,
            }
        };
        Ok(prediction)
    }
}
