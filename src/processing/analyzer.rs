//! Scoring engine: JD and resume text in, ScoreReport out

use crate::config::{Config, MatchMode, ScoringConfig};
use crate::error::{AtsScorerError, Result};
use crate::processing::aggregator::{Aggregator, CategoryScore, Decision};
use crate::processing::ats_matcher::{ATSMatcher, MatchResult};
use crate::processing::category_scorer::{Category, CategoryScorer};
use crate::processing::gap_report::{GapReport, GapReporter};
use crate::processing::lexicon::{Lexicon, LexiconMatcher};
use crate::processing::requirements::{RequirementExtractor, RequirementSet};
use crate::processing::text_processor::{ProcessedText, TextProcessor};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Scoring engine that coordinates the scoring pipeline.
///
/// Holds only immutable state, so one engine can score many resumes from many threads.
pub struct ScoringEngine {
    processor: TextProcessor,
    lexicon: LexiconMatcher,
    extractor: RequirementExtractor,
    matcher: ATSMatcher,
    scorer: CategoryScorer,
    aggregator: Aggregator,
    gap_reporter: GapReporter,
    info: EngineInfo,
}

/// Complete result of scoring one resume against one JD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Weighted total in [0, 100], rounded to two decimals
    pub total_score: f32,
    pub decision: Decision,
    /// One row per category in report order
    pub categories: Vec<CategoryScore>,
    pub requirements: RequirementSet,
    pub matches: MatchResult,
    pub gaps: GapReport,
}

impl ScoreReport {
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn fraction(&self, category: Category) -> f32 {
        self.category(category).map_or(0.0, |c| c.fraction)
    }
}

/// A JD prepared once and reused across resumes.
#[derive(Debug, Clone)]
pub struct JobAnalysis {
    pub processed: ProcessedText,
    pub requirements: RequirementSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based position on the leaderboard
    pub rank: usize,
    pub name: String,
    pub report: ScoreReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub lexicon_phrases: usize,
    pub match_mode: MatchMode,
    pub keyword_top_n: usize,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(&Config::default()).expect("Default scoring configuration must be valid")
    }
}

impl ScoringEngine {
    /// Create a new scoring engine with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_lexicon(&config.scoring, &config.lexicon)
    }

    pub fn with_lexicon(scoring: &ScoringConfig, lexicon: &Lexicon) -> Result<Self> {
        scoring.validate()?;

        let lexicon_matcher = LexiconMatcher::new(lexicon, scoring.match_mode)?;
        let info = EngineInfo {
            lexicon_phrases: lexicon_matcher.phrase_count(),
            match_mode: scoring.match_mode,
            keyword_top_n: scoring.keyword_top_n,
        };

        log::debug!(
            "Scoring engine ready: {} lexicon phrases, {:?} matching, top {} keywords",
            info.lexicon_phrases,
            info.match_mode,
            info.keyword_top_n
        );

        let mut matcher = ATSMatcher::new(scoring.match_mode, &scoring.section_headers);
        matcher.set_fuzzy_threshold(scoring.near_miss_threshold);

        Ok(Self {
            processor: TextProcessor::new(&scoring.stopwords),
            lexicon: lexicon_matcher,
            extractor: RequirementExtractor::new(scoring.keyword_top_n),
            matcher,
            scorer: CategoryScorer::new(scoring.experience),
            aggregator: Aggregator::new(&scoring.weights, scoring.thresholds),
            gap_reporter: GapReporter,
            info,
        })
    }

    pub fn analyze_job(&self, jd_text: &str) -> JobAnalysis {
        let processed = self.processor.process(jd_text);
        let requirements = self.extractor.extract(&processed, &self.lexicon, &self.processor);
        JobAnalysis {
            processed,
            requirements,
        }
    }

    /// Score one resume. Total over all string input; empty text just scores low.
    pub fn score(&self, jd_text: &str, resume_text: &str) -> ScoreReport {
        self.score_against(&self.analyze_job(jd_text), resume_text)
    }

    pub fn score_against(&self, job: &JobAnalysis, resume_text: &str) -> ScoreReport {
        let resume = self.processor.process(resume_text);
        let matches = self.matcher.match_resume(&job.requirements, &resume, &self.lexicon);
        let fractions = self.scorer.score_all(&job.requirements, &matches);
        let aggregate = self.aggregator.aggregate(&fractions);
        let gaps = self.gap_reporter.report(&job.requirements, &matches);

        log::debug!(
            "Scored resume ({} words): {:.2} -> {}",
            resume.word_count,
            aggregate.total_score,
            aggregate.decision
        );

        ScoreReport {
            total_score: aggregate.total_score,
            decision: aggregate.decision,
            categories: aggregate.categories,
            requirements: job.requirements.clone(),
            matches,
            gaps,
        }
    }

    /// Like [`score`](Self::score) but refuses blank input.
    pub fn score_checked(&self, jd_text: &str, resume_text: &str) -> Result<ScoreReport> {
        ensure_present("Job description", jd_text)?;
        ensure_present("Resume", resume_text)?;
        Ok(self.score(jd_text, resume_text))
    }

    /// Score every resume against one JD, best first.
    ///
    /// Resumes are scored in parallel; the sort is stable so equal scores keep input order.
    pub fn rank<S>(&self, jd_text: &str, resumes: &IndexMap<String, S>) -> Vec<RankedCandidate>
    where
        S: AsRef<str> + Sync,
    {
        let job = self.analyze_job(jd_text);
        let entries: Vec<(&String, &S)> = resumes.iter().collect();

        let mut scored: Vec<(String, ScoreReport)> = entries
            .par_iter()
            .map(|(name, text)| (name.to_string(), self.score_against(&job, text.as_ref())))
            .collect();

        scored.sort_by(|a, b| b.1.total_score.total_cmp(&a.1.total_score));

        log::info!("Ranked {} resumes", scored.len());

        scored
            .into_iter()
            .enumerate()
            .map(|(i, (name, report))| RankedCandidate {
                rank: i + 1,
                name,
                report,
            })
            .collect()
    }

    /// Like [`rank`](Self::rank) but refuses a blank JD, an empty batch, or any blank resume.
    pub fn rank_checked<S>(
        &self,
        jd_text: &str,
        resumes: &IndexMap<String, S>,
    ) -> Result<Vec<RankedCandidate>>
    where
        S: AsRef<str> + Sync,
    {
        ensure_present("Job description", jd_text)?;
        if resumes.is_empty() {
            return Err(AtsScorerError::InputMissing("No resumes to rank".to_string()));
        }
        for (name, text) in resumes {
            ensure_present(&format!("Resume '{}'", name), text.as_ref())?;
        }
        Ok(self.rank(jd_text, resumes))
    }

    pub fn info(&self) -> &EngineInfo {
        &self.info
    }
}

fn ensure_present(what: &str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        Err(AtsScorerError::InputMissing(format!("{} text is empty", what)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::requirements::YearsRequirement;

    const JD: &str = "Looking for a Python developer with 3-5 years experience, SQL and AWS skills, \
                      bachelor's degree required.";
    const RESUME: &str = "Experienced Python and SQL developer, 4 years of experience, \
                          Bachelor's in Computer Science.";

    #[test]
    fn test_engine_creation() {
        let engine = ScoringEngine::default();
        assert!(engine.info().lexicon_phrases > 0);
        assert_eq!(engine.info().match_mode, MatchMode::Substring);
        assert_eq!(engine.info().keyword_top_n, 30);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.scoring.weights.skills = f32::NAN;
        assert!(ScoringEngine::new(&config).is_err());
    }

    #[test]
    fn test_python_developer_scenario() {
        let report = ScoringEngine::default().score(JD, RESUME);

        assert!(report.matches.skills.matched.contains("python"));
        assert!(report.matches.skills.matched.contains("sql"));
        assert!(report.matches.skills.missing.contains("aws"));
        assert_eq!(report.requirements.experience, Some(YearsRequirement { min: 3.0, max: Some(5.0) }));
        assert_eq!(report.fraction(Category::Experience), 1.0);
        assert_eq!(report.fraction(Category::Education), 1.0);
        assert_eq!(report.gaps.missing_skills, vec!["aws"]);
    }

    #[test]
    fn test_missing_resume_years_scores_zero_experience() {
        let report = ScoringEngine::default()
            .score(JD, "Experienced Python and SQL developer, Bachelor's in Computer Science.");

        assert_eq!(report.fraction(Category::Experience), 0.0);
        assert!(!report.gaps.resume_years_found());
        assert!(report.gaps.experience_gap().is_some());
    }

    #[test]
    fn test_no_requirements_gives_full_credit() {
        let engine = ScoringEngine::default();

        let with = engine.score("need leadership", "Known for leadership");
        let without = engine.score("need leadership", "Quiet individual contributor");

        for report in [&with, &without] {
            assert_eq!(report.fraction(Category::Skills), 1.0);
            assert_eq!(report.fraction(Category::Tools), 1.0);
            assert_eq!(report.fraction(Category::Education), 1.0);
            assert_eq!(report.fraction(Category::Experience), 1.0);
        }
        assert_eq!(with.fraction(Category::SoftSkills), 1.0);
        assert_eq!(without.fraction(Category::SoftSkills), 0.0);
    }

    #[test]
    fn test_empty_inputs_do_not_fail() {
        let engine = ScoringEngine::default();
        for (jd, resume) in [("", ""), (JD, ""), ("", RESUME), ("!!!", "???")] {
            let report = engine.score(jd, resume);
            assert!((0.0..=100.0).contains(&report.total_score));
            assert_eq!(report.categories.len(), Category::ALL.len());
        }
    }

    #[test]
    fn test_score_checked_refuses_blank_input() {
        let engine = ScoringEngine::default();
        assert!(matches!(engine.score_checked("  ", RESUME), Err(AtsScorerError::InputMissing(_))));
        assert!(matches!(engine.score_checked(JD, "\n"), Err(AtsScorerError::InputMissing(_))));
        assert!(engine.score_checked(JD, RESUME).is_ok());
    }

    #[test]
    fn test_rank_orders_by_score_and_keeps_ties_in_input_order() {
        let engine = ScoringEngine::default();
        let mut resumes = IndexMap::new();
        resumes.insert("blank_a".to_string(), "Hello".to_string());
        resumes.insert("strong".to_string(), RESUME.to_string());
        resumes.insert("blank_b".to_string(), "Hello".to_string());

        let ranked = engine.rank(JD, &resumes);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["strong", "blank_a", "blank_b"]);
        assert_eq!(ranked.iter().map(|c| c.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(ranked[0].report.total_score > ranked[1].report.total_score);
    }

    #[test]
    fn test_rank_checked() {
        let engine = ScoringEngine::default();
        let empty: IndexMap<String, String> = IndexMap::new();
        assert!(engine.rank_checked(JD, &empty).is_err());

        let mut resumes = IndexMap::new();
        resumes.insert("a".to_string(), RESUME);
        resumes.insert("b".to_string(), " ");
        assert!(matches!(engine.rank_checked(JD, &resumes), Err(AtsScorerError::InputMissing(_))));
    }

    #[test]
    fn test_word_boundary_mode_is_opt_in() {
        let jd = "Java developer";
        let resume = "JavaScript developer";

        let substring = ScoringEngine::default().score(jd, resume);
        assert_eq!(substring.fraction(Category::Skills), 1.0);

        let mut config = Config::default();
        config.scoring.match_mode = MatchMode::WordBoundary;
        let bounded = ScoringEngine::new(&config).unwrap().score(jd, resume);
        assert_eq!(bounded.fraction(Category::Skills), 0.0);
    }

    #[test]
    fn test_overlapping_phrase_counts_in_word_boundary_mode() {
        let mut config = Config::default();
        config.scoring.match_mode = MatchMode::WordBoundary;
        config.lexicon.skills = vec!["business to business".to_string()];
        let engine = ScoringEngine::new(&config).unwrap();

        let text = "ebusiness to business to business sales";
        let report = engine.score(text, text);

        assert!(report.requirements.skills.contains("business to business"));
        assert!(report.matches.skills.missing.is_empty());
        assert_eq!(report.fraction(Category::Skills), 1.0);
    }

    #[test]
    fn test_non_ascii_digits_do_not_hide_later_years() {
        let engine = ScoringEngine::default();

        let report = engine.score("3-5 years experience", "\u{664} years abroad, 4 years at Acme");
        assert_eq!(report.matches.resume_years, Some(4.0));
        assert_eq!(report.fraction(Category::Experience), 1.0);

        let report = engine.score("\u{663}-\u{665} years abroad, 3-5 years overall", "4 years");
        assert_eq!(report.requirements.experience, Some(YearsRequirement { min: 3.0, max: Some(5.0) }));
    }

    #[test]
    fn test_huge_weight_still_scores_a_perfect_resume() {
        let mut config = Config::default();
        config.scoring.weights.skills = f32::MAX;
        let engine = ScoringEngine::new(&config).unwrap();

        let report = engine.score("Python and SQL", "Python and SQL");
        assert!((report.total_score - 100.0).abs() < 0.01, "score was {}", report.total_score);

        config.scoring.weights.tools = f32::MAX;
        assert!(ScoringEngine::new(&config).is_err());
    }

    #[test]
    fn test_near_miss_threshold_comes_from_config() {
        let jd = "Must know kubernetes";
        let resume = "Deployed on kubernets";

        let default = ScoringEngine::default().score(jd, resume);
        assert_eq!(default.gaps.near_misses.len(), 1);

        let mut config = Config::default();
        config.scoring.near_miss_threshold = 1.0;
        let strict = ScoringEngine::new(&config).unwrap().score(jd, resume);
        assert!(strict.gaps.near_misses.is_empty());
    }

    #[test]
    fn test_common_words_do_not_create_skill_requirements() {
        let report = ScoringEngine::default()
            .score("Build scalable services our customers trust", "Gardener");
        assert!(report.requirements.skills.is_empty(), "{:?}", report.requirements.skills);
    }
}
