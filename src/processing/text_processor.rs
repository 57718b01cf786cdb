//! Text processing and normalization

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Lower-case, alphanumeric-plus-single-space text with no leading or trailing space.
///
/// Only constructible through [`NormalizedText::new`], which enforces the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let mut normalized = String::with_capacity(text.len());
        let mut pending_space = false;

        for c in text.chars().flat_map(char::to_lowercase) {
            if c.is_alphanumeric() {
                if pending_space && !normalized.is_empty() {
                    normalized.push(' ');
                }
                pending_space = false;
                normalized.push(c);
            } else {
                pending_space = true;
            }
        }

        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|w| !w.is_empty())
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize arbitrary text. Empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    NormalizedText::new(text).0
}

/// One input document prepared for scoring.
#[derive(Debug, Clone)]
pub struct ProcessedText {
    /// Lower-cased original; the years and numeric patterns need its punctuation.
    pub lowered: String,
    pub normalized: NormalizedText,
    pub word_count: usize,
}

pub struct TextProcessor {
    stop_words: HashSet<String>,
    min_token_len: usize,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl TextProcessor {
    pub fn new(stop_words: &[String]) -> Self {
        Self {
            stop_words: stop_words.iter().map(|w| normalize(w)).collect(),
            min_token_len: 3,
        }
    }

    pub fn process(&self, text: &str) -> ProcessedText {
        let normalized = NormalizedText::new(text);
        let word_count = normalized.words().count();

        ProcessedText {
            lowered: text.to_lowercase(),
            normalized,
            word_count,
        }
    }

    /// Tokens eligible for keyword density: no stop words, at least three characters.
    pub fn tokenize<'a>(&'a self, text: &'a NormalizedText) -> impl Iterator<Item = &'a str> + 'a {
        text.words()
            .filter(move |w| w.chars().count() >= self.min_token_len && !self.stop_words.contains(*w))
    }

    /// Top `max_keywords` tokens by frequency; ties keep first-seen order.
    pub fn extract_keywords(&self, text: &NormalizedText, max_keywords: usize) -> Vec<String> {
        let mut word_freq: IndexMap<&str, usize> = IndexMap::new();
        for token in self.tokenize(text) {
            *word_freq.entry(token).or_insert(0) += 1;
        }

        let mut keywords: Vec<(&str, usize)> = word_freq.into_iter().collect();
        // sort_by is stable, so equal counts stay in first-seen order
        keywords.sort_by(|a, b| b.1.cmp(&a.1));

        keywords
            .into_iter()
            .take(max_keywords)
            .map(|(word, _)| word.to_string())
            .collect()
    }
}
