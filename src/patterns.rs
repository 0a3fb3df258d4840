//! Structural pattern tags for single source lines
//!
//! A fixed table of case-insensitive regexes evaluated on the trimmed line.
//! Tags are descriptive only; they never influence a prediction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Structural tag detected on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinePattern {
    #[serde(rename = "Function Def")]
    FunctionDef,
    #[serde(rename = "Class Def")]
    ClassDef,
    #[serde(rename = "Import Statement")]
    ImportStatement,
    #[serde(rename = "Comment")]
    Comment,
    #[serde(rename = "Loop")]
    Loop,
    #[serde(rename = "Conditional")]
    Conditional,
    #[serde(rename = "Print Statement")]
    PrintStatement,
    #[serde(rename = "Input Statement")]
    InputStatement,
    #[serde(rename = "List Comprehension")]
    ListComprehension,
    #[serde(rename = "Lambda")]
    Lambda,
    #[serde(rename = "Exception Handling")]
    ExceptionHandling,
    #[serde(rename = "Docstring")]
    Docstring,
    #[serde(rename = "F String")]
    FString,
}

impl std::fmt::Display for LinePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LinePattern::FunctionDef => "Function Def",
            LinePattern::ClassDef => "Class Def",
            LinePattern::ImportStatement => "Import Statement",
            LinePattern::Comment => "Comment",
            LinePattern::Loop => "Loop",
            LinePattern::Conditional => "Conditional",
            LinePattern::PrintStatement => "Print Statement",
            LinePattern::InputStatement => "Input Statement",
            LinePattern::ListComprehension => "List Comprehension",
            LinePattern::Lambda => "Lambda",
            LinePattern::ExceptionHandling => "Exception Handling",
            LinePattern::Docstring => "Docstring",
            LinePattern::FString => "F String",
        };
        f.write_str(name)
    }
}

static PATTERN_TABLE: OnceLock<Vec<(LinePattern, Regex)>> = OnceLock::new();

fn pattern_table() -> &'static [(LinePattern, Regex)] {
    PATTERN_TABLE.get_or_init(|| {
        [
            (LinePattern::FunctionDef, r"^def\s+\w+\s*\("),
            (LinePattern::ClassDef, r"^class\s+\w+"),
            (LinePattern::ImportStatement, r"^(import|from)\s+"),
            (LinePattern::Comment, r"^\s*#"),
            (LinePattern::Loop, r"^\s*(for|while)\s+"),
            (LinePattern::Conditional, r"^\s*if\s+"),
            (LinePattern::PrintStatement, r"print\s*\("),
            (LinePattern::InputStatement, r"input\s*\("),
            (LinePattern::ListComprehension, r"\[.*for.*in.*\]"),
            (LinePattern::Lambda, r"lambda\s+"),
            (LinePattern::ExceptionHandling, r"^\s*(try|except|finally):"),
            (LinePattern::Docstring, r#"""".*""""#),
            (LinePattern::FString, r#"f["'].*\{.*\}.*["']"#),
        ]
        .into_iter()
        .map(|(tag, pattern)| {
            let regex = Regex::new(&format!("(?i){pattern}")).expect("valid regex");
            (tag, regex)
        })
        .collect()
    })
}

/// Detect structural patterns on one line, in table order
pub fn detect_patterns(line: &str) -> Vec<LinePattern> {
    let trimmed = line.trim();
    pattern_table()
        .iter()
        .filter(|(_, regex)| regex.is_match(trimmed))
        .map(|(tag, _)| *tag)
        .collect()
}
