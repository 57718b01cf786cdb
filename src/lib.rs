//! ATS-style resume scoring
//!
//! Scores a resume against a job description across eight weighted categories and
//! ranks batches of resumes. The scoring core in [`processing`] is pure and total over
//! string input; [`input`] and [`output`] handle files and report rendering.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{AtsScorerError, Result};
pub use processing::{Category, Decision, RankedCandidate, ScoreReport, ScoringEngine};

use indexmap::IndexMap;
use std::sync::OnceLock;

fn default_engine() -> &'static ScoringEngine {
    static ENGINE: OnceLock<ScoringEngine> = OnceLock::new();
    ENGINE.get_or_init(ScoringEngine::default)
}

/// Score one resume against a JD with the built-in lexicons and weights.
pub fn score(jd_text: &str, resume_text: &str) -> ScoreReport {
    default_engine().score(jd_text, resume_text)
}

/// Rank resumes against a JD, best first; ties keep input order.
pub fn rank<S>(jd_text: &str, resumes: &IndexMap<String, S>) -> Vec<RankedCandidate>
where
    S: AsRef<str> + Sync,
{
    default_engine().rank(jd_text, resumes)
}
