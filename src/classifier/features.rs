//! Feature extraction for authorship classification
//!
//! Turns raw text (a whole file or a single line) into a fixed-width
//! numeric vector. The core only sees the `FeatureExtractor` trait;
//! `HashingVectorizer` is a stateless character n-gram implementation.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Feature vector for one input
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    /// Raw feature values
    pub values: Vec<f32>,
}

impl Features {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Turns text into a feature vector.
///
/// Implementations must be deterministic and hold no per-call state, since
/// one extractor serves every line of every concurrent analysis.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Features>;

    /// Width of every vector this extractor produces
    fn dimensions(&self) -> usize;
}

/// Source language, which decides the comment marker and n-gram range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Java,
    #[serde(alias = "js")]
    JavaScript,
}

impl Language {
    /// Line-comment marker
    pub fn comment_marker(&self) -> &'static str {
        match self {
            Language::Python => "#",
            Language::Java | Language::JavaScript => "//",
        }
    }

    /// Inclusive character n-gram range
    pub fn ngram_range(&self) -> (usize, usize) {
        match self {
            Language::Python => (3, 5),
            Language::Java => (3, 7),     // Longer for verbose syntax
            Language::JavaScript => (2, 6),
        }
    }
}

/// Default vector width
pub const DEFAULT_DIMENSIONS: usize = 5000;

/// Character n-gram vectorizer using the hashing trick.
///
/// Text is lowercased (optionally), runs of whitespace collapse to a single
/// space, every n-gram in the range is hashed with xxh3 into one of
/// `dimensions` buckets, and the count vector is L2-normalised.
#[derive(Debug, Clone)]
pub struct HashingVectorizer {
    ngram_min: usize,
    ngram_max: usize,
    dimensions: usize,
    lowercase: bool,
}

impl HashingVectorizer {
    pub fn new(ngram_min: usize, ngram_max: usize, dimensions: usize, lowercase: bool) -> Self {
        let ngram_min = ngram_min.max(1);
        Self {
            ngram_min,
            ngram_max: ngram_max.max(ngram_min),
            dimensions: dimensions.max(1),
            lowercase,
        }
    }

    /// Vectorizer with the language's default n-gram range
    pub fn for_language(language: Language) -> Self {
        let (min, max) = language.ngram_range();
        Self::new(min, max, DEFAULT_DIMENSIONS, true)
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        (self.ngram_min, self.ngram_max)
    }

    fn normalize_text(&self, text: &str) -> Vec<char> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let mut chars = Vec::with_capacity(text.len());
        let mut prev_space = false;
        for c in text.chars() {
            if c.is_whitespace() {
                if !prev_space {
                    chars.push(' ');
                }
                prev_space = true;
            } else {
                chars.push(c);
                prev_space = false;
            }
        }
        chars
    }

    fn bucket(&self, gram: &[char]) -> usize {
        let gram: String = gram.iter().collect();
        (xxh3_64(gram.as_bytes()) % self.dimensions as u64) as usize
    }
}

impl Default for HashingVectorizer {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

impl FeatureExtractor for HashingVectorizer {
    fn extract(&self, text: &str) -> Result<Features> {
        let chars = self.normalize_text(text);
        let mut values = vec![0.0f32; self.dimensions];

        for n in self.ngram_min..=self.ngram_max {
            if chars.len() < n {
                break;
            }
            for window in chars.windows(n) {
                values[self.bucket(window)] += 1.0;
            }
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in values.iter_mut() {
                *v /= norm;
            }
        }

        Ok(Features::new(values))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width() {
        let vectorizer = HashingVectorizer::new(2, 3, 64, true);
        let short = vectorizer.extract("x = 1").unwrap();
        let long = vectorizer.extract("def compute(values):\n    return sum(values)").unwrap();
        assert_eq!(short.len(), 64);
        assert_eq!(long.len(), 64);
        assert_eq!(vectorizer.dimensions(), 64);
    }

    #[test]
    fn test_deterministic_and_normalised() {
        let vectorizer = HashingVectorizer::default();
        let a = vectorizer.extract("for item in items: print(item)").unwrap();
        let b = vectorizer.extract("for item in items: print(item)").unwrap();
        assert_eq!(a, b);

        let norm: f32 = a.values.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "expected unit norm, got {norm}");
    }

    #[test]
    fn test_case_and_whitespace_folding() {
        let vectorizer = HashingVectorizer::new(2, 4, 256, true);
        let a = vectorizer.extract("Return   Value").unwrap();
        let b = vectorizer.extract("return value").unwrap();
        assert_eq!(a, b);

        let case_sensitive = HashingVectorizer::new(2, 4, 256, false);
        let a = case_sensitive.extract("Return").unwrap();
        let b = case_sensitive.extract("return").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_text_shorter_than_ngram_is_zero_vector() {
        let vectorizer = HashingVectorizer::new(3, 5, 32, true);
        let features = vectorizer.extract("ab").unwrap();
        assert!(features.values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_language_defaults() {
        assert_eq!(Language::Python.comment_marker(), "#");
        assert_eq!(Language::Java.comment_marker(), "//");
        assert_eq!(Language::JavaScript.ngram_range(), (2, 6));
        assert_eq!(HashingVectorizer::for_language(Language::Java).ngram_range(), (3, 7));
    }

    #[test]
    fn test_degenerate_settings_are_clamped() {
        let vectorizer = HashingVectorizer::new(0, 0, 0, true);
        assert_eq!(vectorizer.ngram_range(), (1, 1));
        assert_eq!(vectorizer.dimensions(), 1);
    }
}
