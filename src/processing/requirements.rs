//! Requirement extraction from a job description

use crate::processing::category_scorer::Category;
use crate::processing::lexicon::LexiconMatcher;
use crate::processing::text_processor::{ProcessedText, TextProcessor};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Years of experience asked for by a JD. `max == None` is an open-ended "N+ years".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearsRequirement {
    pub min: f32,
    pub max: Option<f32>,
}

impl YearsRequirement {
    pub fn describe(&self) -> String {
        match self.max {
            Some(max) if (max - self.min).abs() < f32::EPSILON => format!("{} years", fmt_years(self.min)),
            Some(max) => format!("{}-{} years", fmt_years(self.min), fmt_years(max)),
            None => format!("{}+ years", fmt_years(self.min)),
        }
    }
}

pub(crate) fn fmt_years(years: f32) -> String {
    if years.fract() == 0.0 {
        format!("{}", years as i64)
    } else {
        format!("{:.1}", years)
    }
}

/// What one JD asks for. Built once per JD and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub skills: BTreeSet<String>,
    pub tools: BTreeSet<String>,
    pub education: BTreeSet<String>,
    pub soft_skills: BTreeSet<String>,
    pub experience: Option<YearsRequirement>,
    /// Most frequent JD tokens, most frequent first
    pub keywords: Vec<String>,
}

impl RequirementSet {
    /// Required phrases for a set-based category, `None` for the others.
    pub fn required(&self, category: Category) -> Option<&BTreeSet<String>> {
        match category {
            Category::Skills => Some(&self.skills),
            Category::Tools => Some(&self.tools),
            Category::Education => Some(&self.education),
            Category::SoftSkills => Some(&self.soft_skills),
            _ => None,
        }
    }
}

/// Years-of-experience patterns shared by the JD and resume sides.
///
/// They run on lower-cased original text: normalization would erase the `-`, `+`
/// and `–` the patterns depend on.
pub struct YearsPatterns {
    range: Regex,
    at_least: Regex,
    plus: Regex,
    mention: Regex,
}

impl Default for YearsPatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl YearsPatterns {
    pub fn new() -> Self {
        // ASCII digits only; `\d` would also take digits `f32::from_str` rejects
        const NUM: &str = r"([0-9]{1,2}(?:\.[0-9]+)?)";
        const UNIT: &str = r"(?:years?|yrs?)\b";

        let range = Regex::new(&format!(r"\b{NUM}\s*(?:-|–|—|to)\s*{NUM}\s*\+?\s*{UNIT}"))
            .expect("Invalid years range regex");
        let at_least = Regex::new(&format!(
            r"\b(?:at\s+least|minimum(?:\s+of)?|min\.?)\s+{NUM}\s*\+?\s*{UNIT}"
        ))
        .expect("Invalid at-least years regex");
        let plus = Regex::new(&format!(r"\b{NUM}\s*\+\s*{UNIT}")).expect("Invalid N+ years regex");
        let mention = Regex::new(&format!(r"\b{NUM}\s*\+?\s*{UNIT}")).expect("Invalid years regex");

        Self {
            range,
            at_least,
            plus,
            mention,
        }
    }

    /// JD side: range first, then "at least N" / "N+", otherwise no requirement.
    pub fn requirement(&self, lowered: &str) -> Option<YearsRequirement> {
        if let Some(caps) = self.range.captures(lowered) {
            let a = caps.get(1).and_then(|m| m.as_str().parse::<f32>().ok());
            let b = caps.get(2).and_then(|m| m.as_str().parse::<f32>().ok());
            if let (Some(a), Some(b)) = (a, b) {
                return Some(YearsRequirement {
                    min: a.min(b),
                    max: Some(a.max(b)),
                });
            }
        }

        let at_least = self.at_least.captures(lowered);
        let plus = self.plus.captures(lowered);
        // Earliest of the two open-ended forms wins
        let open_ended = match (at_least, plus) {
            (Some(a), Some(p)) => {
                let a_start = a.get(0).map_or(usize::MAX, |m| m.start());
                let p_start = p.get(0).map_or(usize::MAX, |m| m.start());
                Some(if a_start <= p_start { a } else { p })
            }
            (a, p) => a.or(p),
        };

        open_ended
            .and_then(|caps| caps.get(1).and_then(|m| m.as_str().parse::<f32>().ok()))
            .map(|min| YearsRequirement { min, max: None })
    }

    /// Resume side: the first "N years" / "N yrs" mention, not an exhaustive scan.
    pub fn first_mention(&self, lowered: &str) -> Option<f32> {
        self.mention
            .captures(lowered)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f32>().ok())
    }
}

pub struct RequirementExtractor {
    years: YearsPatterns,
    keyword_top_n: usize,
}

impl RequirementExtractor {
    pub fn new(keyword_top_n: usize) -> Self {
        Self {
            years: YearsPatterns::new(),
            keyword_top_n,
        }
    }

    pub fn extract(
        &self,
        job: &ProcessedText,
        lexicon: &LexiconMatcher,
        processor: &TextProcessor,
    ) -> RequirementSet {
        let text = &job.normalized;

        let requirements = RequirementSet {
            skills: lexicon.skills.find_all(text),
            tools: lexicon.tools.find_all(text),
            education: lexicon.education.find_all(text),
            soft_skills: lexicon.soft_skills.find_all(text),
            experience: self.years.requirement(&job.lowered),
            keywords: processor.extract_keywords(text, self.keyword_top_n),
        };

        log::debug!(
            "JD requirements: {} skills, {} tools, {} education, {} soft skills, years {:?}, {} keywords",
            requirements.skills.len(),
            requirements.tools.len(),
            requirements.education.len(),
            requirements.soft_skills.len(),
            requirements.experience,
            requirements.keywords.len()
        );

        requirements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;
    use crate::processing::lexicon::Lexicon;

    fn years(text: &str) -> Option<YearsRequirement> {
        YearsPatterns::new().requirement(&text.to_lowercase())
    }

    #[test]
    fn test_range_patterns() {
        let expected = Some(YearsRequirement { min: 3.0, max: Some(5.0) });
        assert_eq!(years("3-5 years experience"), expected);
        assert_eq!(years("3 – 5 yrs of Python"), expected);
        assert_eq!(years("between 3 to 5 years"), expected);
        assert_eq!(years("5-3 years"), expected);
    }

    #[test]
    fn test_open_ended_patterns() {
        let expected = Some(YearsRequirement { min: 4.0, max: None });
        assert_eq!(years("At least 4 years in backend roles"), expected);
        assert_eq!(years("4+ years of SQL"), expected);
        assert_eq!(years("minimum of 4 yrs"), expected);
    }

    #[test]
    fn test_range_takes_priority_over_open_ended() {
        assert_eq!(
            years("5+ years preferred, 2-4 years required"),
            Some(YearsRequirement { min: 2.0, max: Some(4.0) })
        );
    }

    #[test]
    fn test_no_years_requirement() {
        assert_eq!(years("need leadership"), None);
        assert_eq!(years("3 years of experience"), None);
        assert_eq!(years(""), None);
    }

    #[test]
    fn test_resume_first_mention() {
        let patterns = YearsPatterns::new();
        assert_eq!(patterns.first_mention("4 years of experience, 10 yrs total"), Some(4.0));
        assert_eq!(patterns.first_mention("2.5 yrs at acme"), Some(2.5));
        assert_eq!(patterns.first_mention("6+ years"), Some(6.0));
        assert_eq!(patterns.first_mention("worked there since 2019"), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(YearsRequirement { min: 3.0, max: Some(5.0) }.describe(), "3-5 years");
        assert_eq!(YearsRequirement { min: 4.0, max: None }.describe(), "4+ years");
        assert_eq!(YearsRequirement { min: 2.5, max: Some(2.5) }.describe(), "2.5 years");
    }

    #[test]
    fn test_extract_from_job_description() {
        let processor = TextProcessor::default();
        let lexicon = LexiconMatcher::new(&Lexicon::default(), MatchMode::Substring).unwrap();
        let extractor = RequirementExtractor::new(30);

        let job = processor.process(
            "Looking for a Python developer with 3-5 years experience, SQL and AWS skills, \
             bachelor's degree required.",
        );
        let requirements = extractor.extract(&job, &lexicon, &processor);

        assert!(requirements.skills.contains("python"));
        assert!(requirements.skills.contains("sql"));
        assert!(requirements.skills.contains("aws"));
        assert!(requirements.education.contains("bachelor"));
        assert!(requirements.tools.is_empty());
        assert_eq!(requirements.experience, Some(YearsRequirement { min: 3.0, max: Some(5.0) }));
        assert!(requirements.keywords.contains(&"python".to_string()));
        assert_eq!(requirements.required(Category::Skills).map(|s| s.len()), Some(3));
        assert!(requirements.required(Category::Keywords).is_none());
    }
}
