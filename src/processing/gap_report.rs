//! Gap report: what the resume lacks, and what to do about it

use crate::processing::ats_matcher::{MatchResult, NearMiss};
use crate::processing::requirements::{fmt_years, RequirementSet, YearsRequirement};
use serde::{Deserialize, Serialize};

/// Missing items per category plus remediation hints. Derived only from the
/// requirements and match result; never changes the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub missing_skills: Vec<String>,
    pub missing_tools: Vec<String>,
    pub missing_soft_skills: Vec<String>,
    /// Listed only when the resume matches none of the JD's qualifications
    pub missing_education: Vec<String>,
    pub required_years: Option<YearsRequirement>,
    pub resume_years: Option<f32>,
    pub missing_sections: Vec<String>,
    /// JD keywords absent from the resume, most frequent first
    pub missing_keywords: Vec<String>,
    pub near_misses: Vec<NearMiss>,
    pub recommendations: Vec<Recommendation>,
}

impl GapReport {
    pub fn resume_years_found(&self) -> bool {
        self.resume_years.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.missing_skills.is_empty()
            && self.missing_tools.is_empty()
            && self.missing_soft_skills.is_empty()
            && self.missing_education.is_empty()
            && self.missing_sections.is_empty()
            && self.missing_keywords.is_empty()
            && self.experience_gap().is_none()
    }

    /// Human-readable experience shortfall, if any.
    pub fn experience_gap(&self) -> Option<String> {
        let required = self.required_years?;
        match self.resume_years {
            None => Some(format!(
                "JD asks for {}; no years of experience stated in the resume",
                required.describe()
            )),
            Some(years) if years < required.min => Some(format!(
                "JD asks for {}; resume states {} years",
                required.describe(),
                fmt_years(years)
            )),
            Some(years) if required.max.is_some_and(|max| years > max) => Some(format!(
                "JD asks for {}; resume states {} years (above range)",
                required.describe(),
                fmt_years(years)
            )),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

pub struct GapReporter;

impl GapReporter {
    pub fn report(&self, requirements: &RequirementSet, matches: &MatchResult) -> GapReport {
        let education_met = requirements.education.is_empty() || !matches.education.matched.is_empty();

        let mut report = GapReport {
            missing_skills: matches.skills.missing.iter().cloned().collect(),
            missing_tools: matches.tools.missing.iter().cloned().collect(),
            missing_soft_skills: matches.soft_skills.missing.iter().cloned().collect(),
            missing_education: if education_met {
                Vec::new()
            } else {
                matches.education.missing.iter().cloned().collect()
            },
            required_years: requirements.experience,
            resume_years: matches.resume_years,
            missing_sections: matches.sections_missing.clone(),
            missing_keywords: requirements
                .keywords
                .iter()
                .filter(|k| matches.keywords.missing.contains(*k))
                .cloned()
                .collect(),
            near_misses: matches.near_misses.clone(),
            recommendations: Vec::new(),
        };

        report.recommendations = self.recommendations(&report, matches);
        report
    }

    fn recommendations(&self, report: &GapReport, matches: &MatchResult) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        let hard_skills: Vec<&str> = report
            .missing_skills
            .iter()
            .chain(&report.missing_tools)
            .map(String::as_str)
            .collect();
        if !hard_skills.is_empty() {
            recommendations.push(Recommendation {
                title: "Add missing skills and tools".to_string(),
                description: format!(
                    "The JD mentions {} but the resume does not. Add the ones you have to your Skills section.",
                    hard_skills.join(", ")
                ),
                priority: Priority::High,
            });
        }

        for near_miss in &report.near_misses {
            recommendations.push(Recommendation {
                title: format!("Check the spelling of '{}'", near_miss.found),
                description: format!(
                    "'{}' looks like '{}' from the JD but does not count as a match.",
                    near_miss.found, near_miss.required
                ),
                priority: Priority::High,
            });
        }

        if let Some(gap) = report.experience_gap() {
            recommendations.push(Recommendation {
                title: "State your years of experience".to_string(),
                description: gap,
                priority: Priority::High,
            });
        }

        if !report.missing_education.is_empty() {
            recommendations.push(Recommendation {
                title: "List your qualifications".to_string(),
                description: format!(
                    "The JD asks for one of: {}.",
                    report.missing_education.join(", ")
                ),
                priority: Priority::Medium,
            });
        }

        if !report.missing_soft_skills.is_empty() {
            recommendations.push(Recommendation {
                title: "Highlight soft skills".to_string(),
                description: format!(
                    "Show evidence of {} in your experience descriptions.",
                    report.missing_soft_skills.join(", ")
                ),
                priority: Priority::Medium,
            });
        }

        if matches.action_verbs.is_empty() || !matches.has_numeric_evidence {
            recommendations.push(Recommendation {
                title: "Quantify achievements".to_string(),
                description: "Pair action verbs such as improved or reduced with measurable results like 30% or 2x."
                    .to_string(),
                priority: Priority::Medium,
            });
        }

        if !report.missing_sections.is_empty() {
            recommendations.push(Recommendation {
                title: "Add standard section headings".to_string(),
                description: format!("Missing headings: {}.", report.missing_sections.join(", ")),
                priority: Priority::Low,
            });
        }

        if !report.missing_keywords.is_empty() {
            let preview: Vec<&str> = report.missing_keywords.iter().take(10).map(String::as_str).collect();
            recommendations.push(Recommendation {
                title: "Mirror the JD's wording".to_string(),
                description: format!("Frequent JD terms not in the resume: {}.", preview.join(", ")),
                priority: Priority::Low,
            });
        }

        recommendations
    }
}
