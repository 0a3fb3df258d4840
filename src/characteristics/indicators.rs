//! Indicator table for AI-like and human-like code traits
//!
//! Each indicator is a line regex with a display label and an optional
//! evidence threshold. Matching lines are counted per indicator; crossing
//! the threshold (count > threshold) produces one evidence string.
//! Indicators without a threshold are counted and reported but never
//! produce evidence unless configuration gives them one.

use crate::config::IndicatorOverride;
use crate::error::{Error, Result};
use crate::models::Label;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

struct BuiltinIndicator {
    name: &'static str,
    side: Label,
    pattern: &'static str,
    label: &'static str,
    threshold: Option<usize>,
}

const BUILTIN: &[BuiltinIndicator] = &[
    // AI-leaning
    BuiltinIndicator {
        name: "verbose_comments",
        side: Label::Ai,
        pattern: r"#\s*[A-Z][a-z]+.*:", // "# Note:", "# Example:"
        label: "Verbose, structured comments",
        threshold: Some(2),
    },
    BuiltinIndicator {
        name: "excessive_type_hints",
        side: Label::Ai,
        pattern: r":\s*[A-Z]\w+(\[.*\])?(\s*->\s*[A-Z]\w+)?",
        label: "Extensive type hints",
        threshold: Some(3),
    },
    BuiltinIndicator {
        name: "placeholder_names",
        side: Label::Ai,
        pattern: r"\b(var\d+|temp\d+|result\d+|data\d+|item\d+)\b",
        label: "Numbered placeholder names",
        threshold: None,
    },
    BuiltinIndicator {
        name: "generic_function_names",
        side: Label::Ai,
        pattern: r"\bdef\s+(process|handle|execute|perform|do)_\w+",
        label: "Generic function names",
        threshold: None,
    },
    BuiltinIndicator {
        name: "overly_structured",
        side: Label::Ai,
        pattern: r"^\s{4,}",
        label: "Deeply indented lines",
        threshold: None,
    },
    BuiltinIndicator {
        name: "docstring_patterns",
        side: Label::Ai,
        pattern: r#"""".*(?:Args|Returns|Raises|Examples?).*""""#,
        label: "Comprehensive docstrings with Args/Returns",
        threshold: Some(0),
    },
    BuiltinIndicator {
        name: "try_except_everywhere",
        side: Label::Ai,
        pattern: r"^\s*try:",
        label: "Excessive error handling blocks",
        threshold: Some(2),
    },
    BuiltinIndicator {
        name: "type_checking",
        side: Label::Ai,
        pattern: r"isinstance\(.*,\s*\(",
        label: "Tuple isinstance checks",
        threshold: None,
    },
    BuiltinIndicator {
        name: "comprehensive_validation",
        side: Label::Ai,
        pattern: r"if\s+.*\s+is\s+(None|not\s+None)",
        label: "Explicit None checks",
        threshold: None,
    },
    // Human-leaning
    BuiltinIndicator {
        name: "personal_comments",
        side: Label::Human,
        pattern: r"#\s*(TODO|FIXME|HACK|NOTE|XXX)",
        label: "Personal TODO/FIXME comments",
        threshold: Some(0),
    },
    BuiltinIndicator {
        name: "debug_prints",
        side: Label::Human,
        pattern: r#"print\(["']debug|print\(f["'].*debug"#,
        label: "Debug print statements",
        threshold: Some(0),
    },
    BuiltinIndicator {
        name: "quick_variable_names",
        side: Label::Human,
        pattern: r"\b[a-z]{1,2}\b\s*=",
        label: "Short variable names",
        threshold: Some(3),
    },
    BuiltinIndicator {
        name: "inline_logic",
        side: Label::Human,
        pattern: r"=.*if.*else",
        label: "Inline conditional expressions",
        threshold: None,
    },
    BuiltinIndicator {
        name: "creative_naming",
        side: Label::Human,
        pattern: r"\b(foo|bar|baz|qux|spam|eggs)\b",
        label: "Casual placeholder naming (foo, bar, etc.)",
        threshold: Some(0),
    },
    BuiltinIndicator {
        name: "casual_comments",
        side: Label::Human,
        pattern: r"#\s*[a-z]",
        label: "Lowercase casual comments",
        threshold: None,
    },
    BuiltinIndicator {
        name: "shortcuts",
        side: Label::Human,
        pattern: r"(^|\s)(i|j|k|n|m|x|y|z)\s*=",
        label: "Single-letter assignments",
        threshold: None,
    },
    BuiltinIndicator {
        name: "experimental_code",
        side: Label::Human,
        pattern: r"#.*test|#.*experiment",
        label: "Test/experiment notes in comments",
        threshold: None,
    },
];

/// A compiled indicator
#[derive(Debug, Clone)]
pub struct Indicator {
    pub name: String,
    /// Which evidence list this indicator feeds
    pub side: Label,
    pub regex: Regex,
    pub label: String,
    /// Evidence is produced when the match count exceeds this
    pub threshold: Option<usize>,
}

impl Indicator {
    /// Evidence string for `count` matching lines, if the threshold is crossed
    pub fn evidence(&self, count: usize) -> Option<String> {
        match self.threshold {
            Some(threshold) if count > threshold => Some(format!("{} ({} found)", self.label, count)),
            _ => None,
        }
    }
}

/// Ordered set of indicators for both sides
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    indicators: Vec<Indicator>,
}

impl IndicatorTable {
    /// The built-in table
    pub fn builtin() -> Self {
        let indicators = BUILTIN
            .iter()
            .map(|builtin| Indicator {
                name: builtin.name.to_string(),
                side: builtin.side,
                regex: Regex::new(builtin.pattern).expect("valid regex"),
                label: builtin.label.to_string(),
                threshold: builtin.threshold,
            })
            .collect();
        Self { indicators }
    }

    /// Built-in table with per-indicator overrides applied.
    ///
    /// Override keys may use `-` or `_`. Unknown names are ignored with a
    /// warning; an invalid replacement pattern is an error.
    pub fn with_overrides(overrides: &HashMap<String, IndicatorOverride>) -> Result<Self> {
        let mut table = Self::builtin();

        for (raw_name, over) in overrides {
            let name = normalize_indicator_name(raw_name);
            let Some(pos) = table.indicators.iter().position(|i| i.name == name) else {
                warn!("Ignoring override for unknown indicator '{}'", raw_name);
                continue;
            };

            if over.enabled == Some(false) {
                debug!("Indicator {} disabled by config", name);
                table.indicators.remove(pos);
                continue;
            }

            let indicator = &mut table.indicators[pos];
            if let Some(pattern) = &over.pattern {
                indicator.regex = Regex::new(pattern).map_err(|source| Error::InvalidIndicator {
                    name: name.clone(),
                    source,
                })?;
            }
            if let Some(threshold) = over.threshold {
                indicator.threshold = Some(threshold);
            }
            if let Some(label) = &over.label {
                indicator.label = label.clone();
            }
        }

        Ok(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Indicator> {
        let name = normalize_indicator_name(name);
        self.indicators.iter().find(|i| i.name == name)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl Default for IndicatorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `Verbose-Comments` → `verbose_comments`
pub fn normalize_indicator_name(name: &str) -> String {
    name.trim().to_lowercase().replace('-', "_")
}
