//! Line-by-line analysis with file-verdict reconciliation
//!
//! Line models and the file-level ensemble are trained independently and
//! disagree sharply on short inputs. After scoring every non-blank line with
//! one designated model, a single reconciliation pass pulls the line
//! distribution toward the file verdict when the two are clearly at odds.

use crate::classifier::{FeatureExtractor, ModelPool};
use crate::models::{Label, LineAnalysis, ModelId};
use crate::patterns::detect_patterns;
use tracing::{debug, trace};

/// Below this AI share, an AI file verdict is inconsistent with its lines
pub const MIN_AI_RATIO_FOR_AI_FILE: f64 = 0.3;

/// Above this AI share, a human file verdict is inconsistent with its lines
pub const MAX_AI_RATIO_FOR_HUMAN_FILE: f64 = 0.7;

/// Share of lines the file's label is brought up to
pub const RECONCILE_TARGET_RATIO: f64 = 0.5;

/// Confidence written on every flipped line (assigned, not measured)
pub const SENTINEL_CONFIDENCE: f64 = 0.55;

/// Physical lines split on `\n` only, so a `\r` stays part of the line.
/// A trailing newline does not start another line.
pub fn raw_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}

/// Non-blank lines with their 1-based numbers in the original text
pub fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    raw_lines(text)
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
}

/// Score every non-blank line with `model`, then reconcile with `overall`.
///
/// Lines whose extraction or prediction fails are skipped. Returns nothing
/// when `model` is not in the pool.
pub fn analyze_lines(
    pool: &ModelPool,
    extractor: &dyn FeatureExtractor,
    text: &str,
    model: ModelId,
    overall: Label,
) -> Vec<LineAnalysis> {
    if !pool.contains(model) {
        debug!("Line model {} not in pool, skipping line analysis", model.as_str());
        return Vec::new();
    }

    let mut analyses = Vec::new();
    for (line_number, line) in numbered_lines(text) {
        let features = match extractor.extract(line) {
            Ok(features) => features,
            Err(e) => {
                trace!("Skipping line {}: {}", line_number, e);
                continue;
            }
        };
        let result = match pool.predict(model, &features) {
            Some(Ok(result)) => result,
            Some(Err(e)) => {
                trace!("Skipping line {}: {}", line_number, e);
                continue;
            }
            None => continue,
        };

        analyses.push(LineAnalysis {
            line_number,
            content: line.to_string(),
            prediction: result.prediction,
            confidence: result.confidence,
            patterns: detect_patterns(line),
        });
    }

    reconcile(analyses, overall)
}

/// One-shot consistency pass between line verdicts and the file verdict.
///
/// Runs only when an AI file has under 30% AI lines or a human file has
/// over 70% AI lines. The lowest-confidence opposing lines (stable order on
/// ties) flip to the file's label until it holds `floor(n * 0.5)` lines.
pub fn reconcile(mut lines: Vec<LineAnalysis>, overall: Label) -> Vec<LineAnalysis> {
    if lines.is_empty() {
        return lines;
    }

    let total = lines.len();
    let ai_count = lines.iter().filter(|l| l.prediction == Label::Ai).count();
    let ai_ratio = ai_count as f64 / total as f64;

    let inconsistent = match overall {
        Label::Ai => ai_ratio < MIN_AI_RATIO_FOR_AI_FILE,
        Label::Human => ai_ratio > MAX_AI_RATIO_FOR_HUMAN_FILE,
        Label::Unknown => false,
    };
    if !inconsistent {
        return lines;
    }
    let Some(opposite) = overall.opposite() else {
        return lines;
    };

    let current = lines.iter().filter(|l| l.prediction == overall).count();
    let desired = (total as f64 * RECONCILE_TARGET_RATIO).floor() as usize;
    if current >= desired {
        return lines;
    }

    let mut candidates: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.prediction == opposite)
        .map(|(i, _)| i)
        .collect();
    // sort_by is stable: equal confidences keep line order
    candidates.sort_by(|&a, &b| lines[a].confidence.total_cmp(&lines[b].confidence));

    let to_flip = desired - current;
    debug!(
        "Reconciling {} lines toward {}: ai_ratio {:.2}, flipping {} of {} candidates",
        total,
        overall,
        ai_ratio,
        to_flip.min(candidates.len()),
        candidates.len()
    );

    for &idx in candidates.iter().take(to_flip) {
        let line = &mut lines[idx];
        line.prediction = overall;
        line.confidence = SENTINEL_CONFIDENCE;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::{BrokenClassifier, FixedClassifier};
    use crate::classifier::{Classifier, Features, Prediction};
    use crate::error::{Error, Result};
    use crate::patterns::LinePattern;

    fn line(n: usize, prediction: Label, confidence: f64) -> LineAnalysis {
        LineAnalysis {
            line_number: n,
            content: format!("line_{n} = {n}"),
            prediction,
            confidence,
            patterns: Vec::new(),
        }
    }

    /// Extractor that encodes the text length; fails on lines containing "boom"
    struct LengthExtractor;

    impl FeatureExtractor for LengthExtractor {
        fn extract(&self, text: &str) -> Result<Features> {
            if text.contains("boom") {
                return Err(Error::Feature("unreadable line".into()));
            }
            Ok(Features::new(vec![text.len() as f32]))
        }

        fn dimensions(&self) -> usize {
            1
        }
    }

    /// Votes AI for lines longer than 10 chars
    struct LengthClassifier;

    impl Classifier for LengthClassifier {
        fn predict(&self, features: &Features) -> Result<Prediction> {
            let len = features.values[0];
            Ok(if len > 10.0 {
                Prediction {
                    label: Label::Ai,
                    confidence: 0.8,
                }
            } else {
                Prediction {
                    label: Label::Human,
                    confidence: 0.7,
                }
            })
        }
    }

    #[test]
    fn test_numbered_lines_skip_blanks() {
        let lines: Vec<(usize, &str)> = numbered_lines("a\n  \nb\n\t\nc").collect();
        assert_eq!(lines, vec![(1, "a"), (3, "b"), (5, "c")]);
    }

    #[test]
    fn test_crlf_content_is_kept_raw() {
        let lines: Vec<&str> = raw_lines("a = 1\r\n\r\nb = 2\r\n").collect();
        assert_eq!(lines, vec!["a = 1\r", "\r", "b = 2\r"]);

        let numbered: Vec<(usize, &str)> = numbered_lines("a = 1\r\n\r\nb = 2").collect();
        assert_eq!(numbered, vec![(1, "a = 1\r"), (3, "b = 2")]);
    }

    #[test]
    fn test_blank_lines_keep_original_numbers() {
        let pool = ModelPool::new().with_model(ModelId::GradientBoost, FixedClassifier(Label::Human, 0.6));
        let text = "x = 1\n   \ny = 2\n\t\nz = 3";

        let lines = analyze_lines(&pool, &LengthExtractor, text, ModelId::GradientBoost, Label::Human);
        let numbers: Vec<usize> = lines.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
        assert_eq!(lines[1].content, "y = 2");
    }

    #[test]
    fn test_missing_line_model_yields_nothing() {
        let pool = ModelPool::new().with_model(ModelId::Logistic, FixedClassifier(Label::Ai, 0.9));
        let lines = analyze_lines(&pool, &LengthExtractor, "x = 1", ModelId::GradientBoost, Label::Ai);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_failing_lines_are_skipped() {
        let pool = ModelPool::new().with_model(ModelId::GradientBoost, LengthClassifier);
        let text = "a = 1\nboom()\nreturn compute_everything(a)";

        let lines = analyze_lines(&pool, &LengthExtractor, text, ModelId::GradientBoost, Label::Human);
        let numbers: Vec<usize> = lines.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(lines[1].prediction, Label::Ai);

        let broken = ModelPool::new().with_model(ModelId::GradientBoost, BrokenClassifier);
        assert!(analyze_lines(&broken, &LengthExtractor, text, ModelId::GradientBoost, Label::Human).is_empty());
    }

    #[test]
    fn test_patterns_attached() {
        let pool = ModelPool::new().with_model(ModelId::GradientBoost, FixedClassifier(Label::Human, 0.6));
        let lines = analyze_lines(
            &pool,
            &LengthExtractor,
            "def run(x):\n    return x",
            ModelId::GradientBoost,
            Label::Human,
        );
        assert_eq!(lines[0].patterns, vec![LinePattern::FunctionDef]);
        assert!(lines[1].patterns.is_empty());
    }

    #[test]
    fn test_consistent_lines_untouched() {
        // 3 of 10 lines AI: ratio 0.3 is not below the threshold
        let lines: Vec<LineAnalysis> = (1..=10)
            .map(|n| {
                if n <= 3 {
                    line(n, Label::Ai, 0.9)
                } else {
                    line(n, Label::Human, 0.4 + n as f64 * 0.01)
                }
            })
            .collect();

        let reconciled = reconcile(lines.clone(), Label::Ai);
        assert_eq!(reconciled, lines);
    }

    #[test]
    fn test_ai_file_flips_lowest_confidence_human_lines() {
        let confidences = [0.9, 0.8, 0.6, 0.95, 0.6, 0.7, 0.65, 0.99, 0.85, 0.75];
        let mut lines: Vec<LineAnalysis> = confidences
            .iter()
            .enumerate()
            .map(|(i, &c)| line(i + 1, Label::Human, c))
            .collect();
        lines[0] = line(1, Label::Ai, 0.9);

        let reconciled = reconcile(lines.clone(), Label::Ai);

        // floor(10 * 0.5) - 1 = 4 flips: 0.6 (line 3), 0.6 (line 5), 0.65 (line 7), 0.7 (line 6)
        let flipped: Vec<usize> = reconciled
            .iter()
            .zip(&lines)
            .filter(|(after, before)| after.prediction != before.prediction)
            .map(|(after, _)| after.line_number)
            .collect();
        assert_eq!(flipped, vec![3, 5, 6, 7]);

        for l in reconciled.iter().filter(|l| flipped.contains(&l.line_number)) {
            assert_eq!(l.prediction, Label::Ai);
            assert_eq!(l.confidence, SENTINEL_CONFIDENCE);
        }
        assert_eq!(reconciled.iter().filter(|l| l.prediction == Label::Ai).count(), 5);
        assert_eq!(reconciled[0].confidence, 0.9);
    }

    #[test]
    fn test_stable_order_among_equal_confidence() {
        let mut lines: Vec<LineAnalysis> = (1..=6).map(|n| line(n, Label::Human, 0.7)).collect();
        lines[5].confidence = 0.5;

        // desired = 3, flip the 0.5 line then lines 1 and 2
        let reconciled = reconcile(lines, Label::Ai);
        let ai: Vec<usize> = reconciled
            .iter()
            .filter(|l| l.prediction == Label::Ai)
            .map(|l| l.line_number)
            .collect();
        assert_eq!(ai, vec![1, 2, 6]);
    }

    #[test]
    fn test_human_file_flips_ai_lines() {
        // 8 of 10 AI (0.8 > 0.7): bring human lines from 2 to 5
        let lines: Vec<LineAnalysis> = (1..=10)
            .map(|n| {
                if n > 8 {
                    line(n, Label::Human, 0.9)
                } else {
                    line(n, Label::Ai, 0.5 + n as f64 * 0.05)
                }
            })
            .collect();

        let reconciled = reconcile(lines, Label::Human);
        let human: Vec<usize> = reconciled
            .iter()
            .filter(|l| l.prediction == Label::Human)
            .map(|l| l.line_number)
            .collect();
        assert_eq!(human, vec![1, 2, 3, 9, 10]);
    }

    #[test]
    fn test_flips_preserve_content_and_patterns() {
        let mut lines: Vec<LineAnalysis> = (1..=4).map(|n| line(n, Label::Human, 0.9)).collect();
        lines[2].patterns = vec![LinePattern::Loop];

        let reconciled = reconcile(lines.clone(), Label::Ai);
        for (after, before) in reconciled.iter().zip(&lines) {
            assert_eq!(after.line_number, before.line_number);
            assert_eq!(after.content, before.content);
            assert_eq!(after.patterns, before.patterns);
        }
    }

    #[test]
    fn test_single_line_cannot_reach_target() {
        // floor(1 * 0.5) = 0, so nothing to do even though ai_ratio is 0
        let lines = vec![line(1, Label::Human, 0.9)];
        let reconciled = reconcile(lines.clone(), Label::Ai);
        assert_eq!(reconciled, lines);
    }

    #[test]
    fn test_unknown_verdict_never_reconciles() {
        let lines: Vec<LineAnalysis> = (1..=4).map(|n| line(n, Label::Ai, 0.9)).collect();
        assert_eq!(reconcile(lines.clone(), Label::Unknown), lines);
    }
}
