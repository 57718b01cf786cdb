//! Per-category fractions in [0, 1]

use crate::config::ExperienceRules;
use crate::processing::ats_matcher::{CategoryMatch, MatchResult};
use crate::processing::requirements::{RequirementSet, YearsRequirement};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Skills,
    Tools,
    Education,
    Experience,
    SoftSkills,
    Achievements,
    Formatting,
    Keywords,
}

impl Category {
    /// Report order.
    pub const ALL: [Category; 8] = [
        Category::Skills,
        Category::Tools,
        Category::Education,
        Category::Experience,
        Category::SoftSkills,
        Category::Achievements,
        Category::Formatting,
        Category::Keywords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Skills => "skills",
            Category::Tools => "tools",
            Category::Education => "education",
            Category::Experience => "experience",
            Category::SoftSkills => "soft_skills",
            Category::Achievements => "achievements",
            Category::Formatting => "formatting",
            Category::Keywords => "keywords",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Skills => "Skills",
            Category::Tools => "Tools",
            Category::Education => "Education",
            Category::Experience => "Experience",
            Category::SoftSkills => "Soft Skills",
            Category::Achievements => "Achievements",
            Category::Formatting => "Formatting",
            Category::Keywords => "Keywords",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction per category, always in [`Category::ALL`] order.
pub type CategoryFractions = IndexMap<Category, f32>;

/// Clamp into [0, 1]; NaN and infinities count as 0.
pub fn clamp_fraction(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub struct CategoryScorer {
    rules: ExperienceRules,
}

impl CategoryScorer {
    pub fn new(rules: ExperienceRules) -> Self {
        Self { rules }
    }

    pub fn score_all(&self, requirements: &RequirementSet, matches: &MatchResult) -> CategoryFractions {
        Category::ALL
            .iter()
            .map(|&category| {
                let fraction = match category {
                    Category::Skills => set_fraction(&matches.skills),
                    Category::Tools => set_fraction(&matches.tools),
                    Category::Education => education_fraction(&matches.education),
                    Category::Experience => {
                        self.experience_fraction(requirements.experience, matches.resume_years)
                    }
                    Category::SoftSkills => set_fraction(&matches.soft_skills),
                    Category::Achievements => achievements_fraction(
                        !matches.action_verbs.is_empty(),
                        matches.has_numeric_evidence,
                    ),
                    Category::Formatting => formatting_fraction(
                        matches.sections_found.len(),
                        matches.sections_found.len() + matches.sections_missing.len(),
                    ),
                    Category::Keywords => set_fraction(&matches.keywords),
                };
                (category, clamp_fraction(fraction))
            })
            .collect()
    }

    /// Experience credit for the first years figure found in a resume.
    pub fn experience_fraction(
        &self,
        requirement: Option<YearsRequirement>,
        resume_years: Option<f32>,
    ) -> f32 {
        let Some(requirement) = requirement else {
            return 1.0;
        };
        let Some(years) = resume_years.filter(|y| y.is_finite()) else {
            return 0.0;
        };

        let fraction = match requirement.max {
            None if years >= requirement.min => 1.0,
            None => 1.0 - self.rules.open_ended_penalty * (requirement.min - years),
            Some(max) if years >= requirement.min && years <= max => 1.0,
            Some(max) => {
                let distance = if years < requirement.min {
                    requirement.min - years
                } else {
                    years - max
                };
                1.0 - self.rules.range_penalty * distance
            }
        };

        clamp_fraction(fraction.max(self.rules.floor))
    }
}

/// Matched over required; nothing required means full credit.
pub fn set_fraction(category: &CategoryMatch) -> f32 {
    let required = category.required_count();
    if required == 0 {
        1.0
    } else {
        category.matched.len() as f32 / required as f32
    }
}

/// Any one listed qualification is enough.
pub fn education_fraction(category: &CategoryMatch) -> f32 {
    if category.required_count() == 0 || !category.matched.is_empty() {
        1.0
    } else {
        0.0
    }
}

pub fn achievements_fraction(has_action_verb: bool, has_number: bool) -> f32 {
    match (has_action_verb, has_number) {
        (true, true) => 1.0,
        (false, false) => 0.0,
        _ => 0.5,
    }
}

pub fn formatting_fraction(found: usize, expected: usize) -> f32 {
    if expected == 0 {
        1.0
    } else {
        found.min(expected) as f32 / expected as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn scorer() -> CategoryScorer {
        CategoryScorer::new(ExperienceRules::default())
    }

    fn category(matched: &[&str], missing: &[&str]) -> CategoryMatch {
        CategoryMatch {
            matched: matched.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            missing: missing.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn open(min: f32) -> Option<YearsRequirement> {
        Some(YearsRequirement { min, max: None })
    }

    fn range(min: f32, max: f32) -> Option<YearsRequirement> {
        Some(YearsRequirement { min, max: Some(max) })
    }

    #[test]
    fn test_category_order_and_names() {
        assert_eq!(Category::ALL.len(), 8);
        assert_eq!(Category::ALL[0], Category::Skills);
        assert_eq!(Category::SoftSkills.to_string(), "soft_skills");
        assert_eq!(Category::SoftSkills.display_name(), "Soft Skills");
    }

    #[test]
    fn test_set_fraction() {
        assert_eq!(set_fraction(&category(&["python", "sql"], &["aws"])), 2.0 / 3.0);
        assert_eq!(set_fraction(&category(&[], &[])), 1.0);
        assert_eq!(set_fraction(&category(&[], &["rust"])), 0.0);
    }

    #[test]
    fn test_education_is_binary() {
        assert_eq!(education_fraction(&category(&["master"], &["phd", "bachelor"])), 1.0);
        assert_eq!(education_fraction(&category(&[], &["phd"])), 0.0);
        assert_eq!(education_fraction(&category(&[], &[])), 1.0);
    }

    #[test]
    fn test_experience_without_requirement() {
        assert_eq!(scorer().experience_fraction(None, None), 1.0);
        assert_eq!(scorer().experience_fraction(None, Some(1.0)), 1.0);
    }

    #[test]
    fn test_experience_without_resume_years() {
        assert_eq!(scorer().experience_fraction(open(3.0), None), 0.0);
        assert_eq!(scorer().experience_fraction(range(3.0, 5.0), None), 0.0);
    }

    #[test]
    fn test_experience_open_ended() {
        let s = scorer();
        assert_eq!(s.experience_fraction(open(4.0), Some(6.0)), 1.0);
        assert!((s.experience_fraction(open(4.0), Some(2.0)) - 0.6).abs() < 1e-6);
        assert_eq!(s.experience_fraction(open(10.0), Some(1.0)), 0.2);
    }

    #[test]
    fn test_experience_closed_range() {
        let s = scorer();
        assert_eq!(s.experience_fraction(range(3.0, 5.0), Some(4.0)), 1.0);
        assert_eq!(s.experience_fraction(range(3.0, 5.0), Some(3.0)), 1.0);
        assert!((s.experience_fraction(range(3.0, 5.0), Some(7.0)) - 0.7).abs() < 1e-6);
        assert!((s.experience_fraction(range(3.0, 5.0), Some(1.0)) - 0.7).abs() < 1e-6);
        assert_eq!(s.experience_fraction(range(3.0, 5.0), Some(20.0)), 0.2);
    }

    #[test]
    fn test_achievements() {
        assert_eq!(achievements_fraction(true, true), 1.0);
        assert_eq!(achievements_fraction(true, false), 0.5);
        assert_eq!(achievements_fraction(false, true), 0.5);
        assert_eq!(achievements_fraction(false, false), 0.0);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(formatting_fraction(2, 3), 2.0 / 3.0);
        assert_eq!(formatting_fraction(0, 0), 1.0);
        assert_eq!(formatting_fraction(3, 3), 1.0);
    }

    #[test]
    fn test_clamp_fraction() {
        assert_eq!(clamp_fraction(f32::NAN), 0.0);
        assert_eq!(clamp_fraction(f32::INFINITY), 0.0);
        assert_eq!(clamp_fraction(-0.5), 0.0);
        assert_eq!(clamp_fraction(1.5), 1.0);
        assert_eq!(clamp_fraction(0.25), 0.25);
    }
}
