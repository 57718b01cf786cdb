//! Fixed vocabularies and the phrase matcher that scans normalized text for them

use crate::config::MatchMode;
use crate::error::{AtsScorerError, Result};
use crate::processing::text_processor::{normalize, NormalizedText};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Category → phrases. Loaded once and never mutated while scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub skills: Vec<String>,
    pub tools: Vec<String>,
    pub education: Vec<String>,
    pub soft_skills: Vec<String>,
    pub action_verbs: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            skills: to_strings(&[
                "python", "java", "javascript", "typescript", "sql", "aws", "excel", "tableau",
                "machine learning", "data analysis", "statistics", "html", "react", "node js",
                "golang", "kotlin", "pandas",
            ]),
            tools: to_strings(&[
                "power bi", "git", "jira", "docker", "kubernetes", "jenkins", "terraform",
                "linux", "azure", "gcp", "spark", "airflow", "snowflake", "confluence",
            ]),
            education: to_strings(&[
                "bachelor", "master", "phd", "doctorate", "mba", "mca", "b tech", "m tech",
                "bsc", "msc", "diploma",
            ]),
            soft_skills: to_strings(&[
                "leadership", "teamwork", "communication", "problem solving", "collaboration",
                "mentoring", "time management", "adaptability", "critical thinking",
                "stakeholder management",
            ]),
            action_verbs: to_strings(&[
                "improved", "reduced", "increased", "managed", "delivered", "achieved",
                "launched", "optimized", "streamlined", "implemented", "designed", "developed",
                "spearheaded", "automated",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A lexicon file as written on disk: any list may be left out.
#[derive(Debug, Default, Deserialize)]
struct LexiconFile {
    skills: Option<Vec<String>>,
    tools: Option<Vec<String>>,
    education: Option<Vec<String>>,
    soft_skills: Option<Vec<String>>,
    action_verbs: Option<Vec<String>>,
}

impl Lexicon {
    /// Lay a role-specific TOML lexicon over this one. Lists the file defines replace
    /// ours; lists it leaves out are kept.
    pub fn overlay_file(&self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: LexiconFile = toml::from_str(&content).map_err(|e| {
            AtsScorerError::Configuration(format!("Failed to parse lexicon '{}': {}", path.display(), e))
        })?;

        Ok(Self {
            skills: file.skills.unwrap_or_else(|| self.skills.clone()),
            tools: file.tools.unwrap_or_else(|| self.tools.clone()),
            education: file.education.unwrap_or_else(|| self.education.clone()),
            soft_skills: file.soft_skills.unwrap_or_else(|| self.soft_skills.clone()),
            action_verbs: file.action_verbs.unwrap_or_else(|| self.action_verbs.clone()),
        })
    }

    pub fn phrase_count(&self) -> usize {
        self.skills.len()
            + self.tools.len()
            + self.education.len()
            + self.soft_skills.len()
            + self.action_verbs.len()
    }
}

/// Multi-phrase scanner over normalized text.
///
/// Phrases are normalized on construction so that `B.Tech` in a lexicon lines up with
/// `b tech` in a document.
pub struct PhraseMatcher {
    automaton: AhoCorasick,
    phrases: Vec<String>,
    mode: MatchMode,
}

impl PhraseMatcher {
    pub fn new<S: AsRef<str>>(phrases: &[S], mode: MatchMode) -> Result<Self> {
        let mut seen = HashSet::new();
        let phrases: Vec<String> = phrases
            .iter()
            .map(|p| normalize(p.as_ref()))
            .filter(|p| !p.is_empty() && seen.insert(p.clone()))
            .collect();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&phrases)
            .map_err(|e| AtsScorerError::Processing(format!("Failed to build phrase matcher: {}", e)))?;

        Ok(Self {
            automaton,
            phrases,
            mode,
        })
    }

    /// Every phrase that occurs in `text`, in alphabetical order.
    pub fn find_all(&self, text: &NormalizedText) -> BTreeSet<String> {
        let haystack = text.as_str();
        let mut found = BTreeSet::new();

        for mat in self.automaton.find_overlapping_iter(haystack) {
            if self.mode == MatchMode::WordBoundary
                && !on_word_boundary(haystack, mat.start(), mat.end())
            {
                continue;
            }
            found.insert(self.phrases[mat.pattern().as_usize()].clone());
        }

        found
    }

    pub fn matches_any(&self, text: &NormalizedText) -> bool {
        !self.find_all(text).is_empty()
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Single-phrase check with the same semantics as [`PhraseMatcher`].
pub fn contains_phrase(text: &NormalizedText, phrase: &str, mode: MatchMode) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let haystack = text.as_str();
    match mode {
        MatchMode::Substring => haystack.contains(phrase),
        // Every start offset, so overlapping occurrences count as they do in `find_all`
        MatchMode::WordBoundary => haystack.char_indices().any(|(start, _)| {
            haystack[start..].starts_with(phrase)
                && on_word_boundary(haystack, start, start + phrase.len())
        }),
    }
}

// Normalized text only separates words with single spaces.
fn on_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let bytes = haystack.as_bytes();
    let left = start == 0 || bytes[start - 1] == b' ';
    let right = end == bytes.len() || bytes[end] == b' ';
    left && right
}

/// Pre-built matchers for every lexicon category.
pub struct LexiconMatcher {
    pub skills: PhraseMatcher,
    pub tools: PhraseMatcher,
    pub education: PhraseMatcher,
    pub soft_skills: PhraseMatcher,
    pub action_verbs: PhraseMatcher,
    mode: MatchMode,
}

impl LexiconMatcher {
    pub fn new(lexicon: &Lexicon, mode: MatchMode) -> Result<Self> {
        Ok(Self {
            skills: PhraseMatcher::new(&lexicon.skills, mode)?,
            tools: PhraseMatcher::new(&lexicon.tools, mode)?,
            education: PhraseMatcher::new(&lexicon.education, mode)?,
            soft_skills: PhraseMatcher::new(&lexicon.soft_skills, mode)?,
            action_verbs: PhraseMatcher::new(&lexicon.action_verbs, mode)?,
            mode,
        })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn phrase_count(&self) -> usize {
        self.skills.len()
            + self.tools.len()
            + self.education.len()
            + self.soft_skills.len()
            + self.action_verbs.len()
    }
}
