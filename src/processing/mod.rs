//! Scoring core: normalization, requirement extraction, matching and aggregation

pub mod text_processor;
pub mod lexicon;
pub mod requirements;
pub mod ats_matcher;
pub mod category_scorer;
pub mod aggregator;
pub mod gap_report;
pub mod analyzer;

pub use aggregator::{CategoryScore, Decision};
pub use analyzer::{RankedCandidate, ScoreReport, ScoringEngine};
pub use category_scorer::Category;
pub use requirements::{RequirementSet, YearsRequirement};
