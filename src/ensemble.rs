//! Ensemble voting over the model pool
//!
//! Each side scores `mean(confidence) * count`, so a side with more voters
//! can win at a lower average confidence. The returned confidence is the
//! winning score divided by the number of voters, which deflates it
//! whenever the vote is split.

use crate::models::{Label, ModelResult, Verdict};

/// Combine per-model results into one verdict. Ties go to human.
pub fn vote(results: &[ModelResult]) -> Verdict {
    if results.is_empty() {
        return Verdict::unknown();
    }

    let ai_score = side_score(results, Label::Ai);
    let human_score = side_score(results, Label::Human);
    let total = results.len() as f64;

    if ai_score > human_score {
        Verdict {
            label: Label::Ai,
            confidence: ai_score / total,
        }
    } else {
        Verdict {
            label: Label::Human,
            confidence: human_score / total,
        }
    }
}

/// `mean * count` of the confidences voting for `label`, 0 when none do
fn side_score(results: &[ModelResult], label: Label) -> f64 {
    let votes: Vec<f64> = results
        .iter()
        .filter(|r| r.prediction == label)
        .map(|r| r.confidence)
        .collect();

    if votes.is_empty() {
        return 0.0;
    }
    let count = votes.len() as f64;
    let mean = votes.iter().sum::<f64>() / count;
    mean * count
}
