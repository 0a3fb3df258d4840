//! Characteristic summary: human-readable evidence behind a verdict
//!
//! Scans the raw text with the indicator table, computes a few structural
//! metrics, and turns threshold crossings into evidence strings. The line
//! breakdown is taken from already-reconciled line analyses.

pub mod indicators;

pub use indicators::{Indicator, IndicatorTable};

use crate::classifier::Language;
use crate::lines::raw_lines;
use crate::models::{CharacteristicsReport, CodeMetrics, Label, LineAnalysis, LineBreakdown};
use std::collections::BTreeMap;
use tracing::debug;

/// Line confidence above which a line counts as high-confidence
pub const HIGH_CONFIDENCE: f64 = 0.8;

const LONG_LINE_CHARS: f64 = 60.0;
const SHORT_LINE_CHARS: f64 = 40.0;
const HIGH_COMMENT_RATIO: f64 = 0.2;
const LOW_EMPTY_RATIO: f64 = 0.05;

/// Builds a `CharacteristicsReport` for one snippet
#[derive(Debug, Clone)]
pub struct CharacteristicSummarizer {
    table: IndicatorTable,
    comment_marker: &'static str,
}

impl Default for CharacteristicSummarizer {
    fn default() -> Self {
        Self::new(IndicatorTable::builtin(), Language::default())
    }
}

impl CharacteristicSummarizer {
    pub fn new(table: IndicatorTable, language: Language) -> Self {
        Self {
            table,
            comment_marker: language.comment_marker(),
        }
    }

    pub fn table(&self) -> &IndicatorTable {
        &self.table
    }

    /// Summarize `code`. Zero-length input yields an empty report.
    ///
    /// Whitespace-only input still gets its metrics and line breakdown, but
    /// no length-based evidence since there are no non-blank lines to measure.
    pub fn summarize(&self, code: &str, lines: &[LineAnalysis]) -> CharacteristicsReport {
        if code.is_empty() {
            return CharacteristicsReport::default();
        }
        let has_content = !code.trim().is_empty();

        let mut ai_pattern_counts = BTreeMap::new();
        let mut human_pattern_counts = BTreeMap::new();
        let mut ai_characteristics = Vec::new();
        let mut human_characteristics = Vec::new();

        for indicator in self.table.iter() {
            let (counts, evidence) = match indicator.side {
                Label::Ai => (&mut ai_pattern_counts, &mut ai_characteristics),
                Label::Human => (&mut human_pattern_counts, &mut human_characteristics),
                Label::Unknown => continue,
            };
            let count = raw_lines(code).filter(|l| indicator.regex.is_match(l)).count();
            counts.insert(indicator.name.clone(), count);
            if let Some(text) = indicator.evidence(count) {
                evidence.push(text);
            }
        }

        let metrics = compute_metrics(code, self.comment_marker);

        if metrics.avg_line_length > LONG_LINE_CHARS {
            ai_characteristics.push(format!(
                "Long average line length ({:.1} chars)",
                metrics.avg_line_length
            ));
        }
        if metrics.comment_ratio > HIGH_COMMENT_RATIO {
            ai_characteristics.push(format!(
                "High comment density ({:.1}%)",
                metrics.comment_ratio * 100.0
            ));
        }
        if has_content && metrics.empty_line_ratio < LOW_EMPTY_RATIO {
            human_characteristics.push(format!(
                "Compact code style with few empty lines ({:.1}% empty)",
                metrics.empty_line_ratio * 100.0
            ));
        }
        if has_content && metrics.avg_line_length < SHORT_LINE_CHARS {
            human_characteristics.push(format!(
                "Concise coding style ({:.1} chars/line)",
                metrics.avg_line_length
            ));
        }

        debug!(
            "Characteristics: {} ai, {} human",
            ai_characteristics.len(),
            human_characteristics.len()
        );

        CharacteristicsReport {
            ai_characteristics,
            human_characteristics,
            metrics,
            ai_pattern_counts,
            human_pattern_counts,
            lines: line_breakdown(lines),
        }
    }
}

/// Structural metrics over `code`.
///
/// Ratios are over every line including blanks; the average length is over
/// non-blank lines only. A trailing newline does not start another line.
pub fn compute_metrics(code: &str, comment_marker: &str) -> CodeMetrics {
    let lines: Vec<&str> = raw_lines(code).collect();
    let total = lines.len().max(1) as f64;

    let lengths: Vec<usize> = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().count())
        .collect();
    let avg_line_length = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    let empty = lines.iter().filter(|l| l.trim().is_empty()).count();
    let comments = lines
        .iter()
        .filter(|l| l.trim_start().starts_with(comment_marker))
        .count();

    CodeMetrics {
        avg_line_length,
        empty_line_ratio: empty as f64 / total,
        comment_ratio: comments as f64 / total,
    }
}

/// Count line verdicts, including high-confidence ones
pub fn line_breakdown(lines: &[LineAnalysis]) -> LineBreakdown {
    let mut breakdown = LineBreakdown {
        total: lines.len(),
        ..Default::default()
    };
    for line in lines {
        let confident = line.confidence > HIGH_CONFIDENCE;
        match line.prediction {
            Label::Ai => {
                breakdown.ai_lines += 1;
                if confident {
                    breakdown.high_confidence_ai += 1;
                }
            }
            Label::Human => {
                breakdown.human_lines += 1;
                if confident {
                    breakdown.high_confidence_human += 1;
                }
            }
            Label::Unknown => {}
        }
    }
    breakdown
}
