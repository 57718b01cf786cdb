//! Resume-side matching against an extracted requirement set

use crate::config::MatchMode;
use crate::processing::lexicon::{contains_phrase, LexiconMatcher};
use crate::processing::requirements::{RequirementSet, YearsPatterns};
use crate::processing::text_processor::{NormalizedText, ProcessedText};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use strsim::jaro_winkler;

/// Required items of one category split by presence in the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

impl CategoryMatch {
    fn partition<'a, I>(required: I, text: &NormalizedText, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let (matched, missing) = required
            .into_iter()
            .cloned()
            .partition(|item| contains_phrase(text, item, mode));
        Self { matched, missing }
    }

    pub fn required_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

/// A missing requirement that the resume spells almost the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMiss {
    pub required: String,
    pub found: String,
    pub similarity: f32,
}

/// Everything the scorer needs to know about one resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub skills: CategoryMatch,
    pub tools: CategoryMatch,
    pub education: CategoryMatch,
    pub soft_skills: CategoryMatch,
    pub keywords: CategoryMatch,
    /// First years figure stated anywhere in the resume
    pub resume_years: Option<f32>,
    pub action_verbs: BTreeSet<String>,
    pub has_numeric_evidence: bool,
    pub sections_found: Vec<String>,
    pub sections_missing: Vec<String>,
    pub near_misses: Vec<NearMiss>,
}

impl MatchResult {
    pub fn total_matched(&self) -> usize {
        self.skills.matched.len()
            + self.tools.matched.len()
            + self.education.matched.len()
            + self.soft_skills.matched.len()
    }
}

/// Matches a resume against a JD's requirements
pub struct ATSMatcher {
    mode: MatchMode,
    years: YearsPatterns,
    numeric: Regex,
    section_headers: Vec<String>,
    fuzzy_threshold: f32,
}

impl ATSMatcher {
    pub fn new(mode: MatchMode, section_headers: &[String]) -> Self {
        let mut seen = HashSet::new();
        let section_headers = section_headers
            .iter()
            .map(|h| NormalizedText::new(h).to_string())
            .filter(|h| !h.is_empty() && seen.insert(h.clone()))
            .collect();

        Self {
            mode,
            years: YearsPatterns::new(),
            numeric: Regex::new(r"[0-9]+(?:[.,][0-9]+)?%?").expect("Invalid numeric regex"),
            section_headers,
            fuzzy_threshold: 0.9,
        }
    }

    pub fn match_resume(
        &self,
        requirements: &RequirementSet,
        resume: &ProcessedText,
        lexicon: &LexiconMatcher,
    ) -> MatchResult {
        let text = &resume.normalized;

        let skills = CategoryMatch::partition(&requirements.skills, text, self.mode);
        let tools = CategoryMatch::partition(&requirements.tools, text, self.mode);
        let education = CategoryMatch::partition(&requirements.education, text, self.mode);
        let soft_skills = CategoryMatch::partition(&requirements.soft_skills, text, self.mode);
        let keywords = CategoryMatch::partition(&requirements.keywords, text, self.mode);

        let (sections_found, sections_missing) = self
            .section_headers
            .iter()
            .cloned()
            .partition(|header| contains_phrase(text, header, self.mode));

        let near_misses = self.find_near_misses(
            skills
                .missing
                .iter()
                .chain(&tools.missing)
                .chain(&soft_skills.missing),
            text,
        );

        let result = MatchResult {
            skills,
            tools,
            education,
            soft_skills,
            keywords,
            resume_years: self.years.first_mention(&resume.lowered),
            action_verbs: lexicon.action_verbs.find_all(text),
            has_numeric_evidence: self.numeric.is_match(&resume.lowered),
            sections_found,
            sections_missing,
            near_misses,
        };

        log::debug!(
            "Resume matched {} requirement phrases, years {:?}, {} action verbs, {} near misses",
            result.total_matched(),
            result.resume_years,
            result.action_verbs.len(),
            result.near_misses.len()
        );

        result
    }

    /// Jaro-Winkler scan of resume n-grams for missing phrases, e.g. "kubernets".
    ///
    /// Only feeds gap hints; a near miss never earns points.
    fn find_near_misses<'a, I>(&self, missing: I, text: &NormalizedText) -> Vec<NearMiss>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let words: Vec<&str> = text.words().collect();
        let mut near_misses = Vec::new();

        for required in missing {
            if required.chars().count() < 4 {
                continue;
            }
            let width = required.split(' ').count();
            if width == 0 || width > words.len() {
                continue;
            }

            let mut best: Option<(f32, String)> = None;
            for window in words.windows(width) {
                let candidate = window.join(" ");
                if candidate == *required {
                    continue;
                }
                let similarity = jaro_winkler(required, &candidate) as f32;
                if similarity >= self.fuzzy_threshold
                    && best.as_ref().map_or(true, |(score, _)| similarity > *score)
                {
                    best = Some((similarity, candidate));
                }
            }

            if let Some((similarity, found)) = best {
                near_misses.push(NearMiss {
                    required: required.clone(),
                    found,
                    similarity,
                });
            }
        }

        near_misses
    }

    pub fn set_fuzzy_threshold(&mut self, threshold: f32) {
        self.fuzzy_threshold = threshold.clamp(0.0, 1.0);
    }

    pub fn section_headers(&self) -> &[String] {
        &self.section_headers
    }
}
