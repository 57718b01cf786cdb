//! Report structures handed to the output formatters

use crate::processing::aggregator::{CategoryScore, Decision};
use crate::processing::analyzer::{EngineInfo, RankedCandidate, ScoreReport};
use crate::processing::category_scorer::Category;
use crate::processing::gap_report::GapReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One resume scored against one JD, ready for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateReport {
    pub candidate: String,
    pub summary: ReportSummary,
    pub score: ScoreReport,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_score: f32,
    pub decision: Decision,
    pub decision_label: String,
    /// Categories earning at least 80% of their weight
    pub strengths: Vec<String>,
    /// Categories earning under half their weight
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub scorer_version: String,
    pub job_file: String,
    pub resume_file: Option<String>,
    pub engine: EngineInfo,
}

/// Batch ranking result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub total_score: f32,
    pub decision: Decision,
    pub categories: Vec<CategoryScore>,
    pub gaps: GapReport,
}

impl CandidateReport {
    pub fn new(
        candidate: impl Into<String>,
        score: ScoreReport,
        job_file: impl Into<String>,
        resume_file: Option<String>,
        engine: &EngineInfo,
    ) -> Self {
        Self {
            candidate: candidate.into(),
            summary: ReportSummary::from_score(&score),
            score,
            metadata: ReportMetadata::new(job_file.into(), resume_file, engine),
        }
    }
}

impl ReportSummary {
    pub fn from_score(score: &ScoreReport) -> Self {
        let mut strengths = Vec::new();
        let mut improvement_areas = Vec::new();

        for row in score.categories.iter().filter(|row| row.weight > 0.0) {
            let label = format!("{} ({:.0}%)", row.category.display_name(), row.fraction * 100.0);
            if row.fraction >= 0.8 {
                strengths.push(label);
            } else if row.fraction < 0.5 {
                improvement_areas.push(label);
            }
        }

        Self {
            total_score: score.total_score,
            decision: score.decision,
            decision_label: score.decision.label().to_string(),
            strengths,
            improvement_areas,
        }
    }
}

impl ReportMetadata {
    pub fn new(job_file: String, resume_file: Option<String>, engine: &EngineInfo) -> Self {
        Self {
            generated_at: Utc::now(),
            scorer_version: env!("CARGO_PKG_VERSION").to_string(),
            job_file,
            resume_file,
            engine: engine.clone(),
        }
    }
}

impl Leaderboard {
    pub fn new(ranked: Vec<RankedCandidate>, job_file: impl Into<String>, engine: &EngineInfo) -> Self {
        let entries = ranked
            .into_iter()
            .map(|candidate| LeaderboardEntry {
                rank: candidate.rank,
                name: candidate.name,
                total_score: candidate.report.total_score,
                decision: candidate.report.decision,
                categories: candidate.report.categories,
                gaps: candidate.report.gaps,
            })
            .collect();

        Self {
            entries,
            metadata: ReportMetadata::new(job_file.into(), None, engine),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many candidates landed in each decision band, best band first.
    pub fn decision_counts(&self) -> [(Decision, usize); 3] {
        [Decision::StrongFit, Decision::MediumFit, Decision::WeakFit]
            .map(|d| (d, self.entries.iter().filter(|e| e.decision == d).count()))
    }
}

impl LeaderboardEntry {
    pub fn points(&self, category: Category) -> f32 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map_or(0.0, |c| c.points)
    }
}
