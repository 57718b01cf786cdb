//! Property tests for the scoring core

use ats_scorer::config::{CategoryWeights, DecisionThresholds};
use ats_scorer::processing::text_processor::normalize;
use ats_scorer::{Category, Decision, ScoringEngine};
use indexmap::IndexMap;
use proptest::prelude::*;

const VOCAB: &[&str] = &[
    "python", "sql", "aws", "react", "docker", "kubernetes", "git", "bachelor", "master",
    "communication", "teamwork", "leadership", "improved", "reduced", "delivered", "40%",
    "2019", "3-5 years", "at least 4 years", "2+ years", "experience", "education", "skills",
    "pipeline", "customers", "platform", "analytics", "the", "and", "with", "team", "built",
];

const FILLER: &[&str] = &[
    "pipeline", "customers", "platform", "analytics", "the", "and", "with", "team", "built",
    "friendly", "office", "weekly", "reports",
];

fn vocab_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..40).prop_map(|words| words.join(" "))
}

fn filler_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FILLER), 1..30).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in "\\PC{0,200}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn total_score_always_in_bounds(jd in "\\PC{0,200}", resume in "\\PC{0,200}") {
        let report = ats_scorer::score(&jd, &resume);
        prop_assert!(report.total_score >= 0.0 && report.total_score <= 100.0);
    }

    #[test]
    fn breakdown_is_consistent(jd in vocab_text(), resume in vocab_text()) {
        let report = ats_scorer::score(&jd, &resume);

        prop_assert_eq!(report.categories.len(), Category::ALL.len());
        let weight_sum: f32 = report.categories.iter().map(|c| c.weight).sum();
        prop_assert!((weight_sum - 100.0).abs() < 1e-3);

        let mut raw = 0.0;
        for row in &report.categories {
            prop_assert!(row.fraction >= 0.0 && row.fraction <= 1.0);
            prop_assert!((row.points - row.fraction * row.weight).abs() < 1e-4);
            raw += row.points;
        }
        prop_assert!((report.total_score - raw).abs() <= 0.01);
    }

    #[test]
    fn scoring_is_deterministic(jd in vocab_text(), resume in vocab_text()) {
        prop_assert_eq!(ats_scorer::score(&jd, &resume), ats_scorer::score(&jd, &resume));
    }

    #[test]
    fn decision_follows_bands(jd in vocab_text(), resume in vocab_text()) {
        let report = ats_scorer::score(&jd, &resume);
        let expected = if report.total_score >= 80.0 {
            Decision::StrongFit
        } else if report.total_score >= 60.0 {
            Decision::MediumFit
        } else {
            Decision::WeakFit
        };
        prop_assert_eq!(report.decision, expected);
    }

    #[test]
    fn higher_score_never_gets_a_worse_decision(a in 0.0f32..=100.0, b in 0.0f32..=100.0) {
        let thresholds = DecisionThresholds::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            Decision::from_score(high, &thresholds).tier() <= Decision::from_score(low, &thresholds).tier()
        );
    }

    #[test]
    fn categories_without_requirements_score_full(jd in filler_text(), resume in vocab_text()) {
        let report = ats_scorer::score(&jd, &resume);

        for category in [
            Category::Skills,
            Category::Tools,
            Category::Education,
            Category::Experience,
            Category::SoftSkills,
        ] {
            prop_assert_eq!(report.fraction(category), 1.0, "{}", category);
        }
    }

    #[test]
    fn resume_identical_to_jd_meets_every_listed_requirement(text in vocab_text()) {
        let report = ats_scorer::score(&text, &text);

        for category in [
            Category::Skills,
            Category::Tools,
            Category::Education,
            Category::SoftSkills,
            Category::Keywords,
        ] {
            prop_assert_eq!(report.fraction(category), 1.0, "{}", category);
        }
    }

    #[test]
    fn normalized_weights_sum_to_hundred(
        raw in prop::collection::vec(0.0f32..50.0, 8),
        bump in 0usize..8,
    ) {
        let mut weights = CategoryWeights::default();
        for (i, category) in Category::ALL.iter().enumerate() {
            let value = if i == bump { raw[i] + 1.0 } else { raw[i] };
            weights = with_weight(weights, *category, value);
        }

        let once = weights.normalized();
        prop_assert!((once.total() - 100.0).abs() < 1e-3);

        let twice = once.normalized();
        for category in Category::ALL {
            prop_assert!((once.get(category) - twice.get(category)).abs() < 1e-4);
        }
    }

    #[test]
    fn ranking_ignores_input_order(
        resumes in prop::collection::vec(vocab_text(), 1..6).prop_shuffle(),
        jd in vocab_text(),
    ) {
        let engine = ScoringEngine::default();

        let forward: IndexMap<String, String> = resumes
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("c{}", i), text.clone()))
            .collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        let scores_of = |ranked: Vec<ats_scorer::RankedCandidate>| {
            let mut by_name: Vec<(String, f32)> =
                ranked.into_iter().map(|c| (c.name, c.report.total_score)).collect();
            by_name.sort_by(|a, b| a.0.cmp(&b.0));
            by_name
        };

        let a = engine.rank(&jd, &forward);
        let b = engine.rank(&jd, &reversed);

        for pair in a.windows(2) {
            prop_assert!(pair[0].report.total_score >= pair[1].report.total_score);
        }
        prop_assert_eq!(scores_of(a), scores_of(b));
    }
}

fn with_weight(mut weights: CategoryWeights, category: Category, value: f32) -> CategoryWeights {
    match category {
        Category::Skills => weights.skills = value,
        Category::Tools => weights.tools = value,
        Category::Education => weights.education = value,
        Category::Experience => weights.experience = value,
        Category::SoftSkills => weights.soft_skills = value,
        Category::Achievements => weights.achievements = value,
        Category::Formatting => weights.formatting = value,
        Category::Keywords => weights.keywords = value,
    }
    weights
}

#[test]
fn strong_fit_scenario() {
    let jd = "Python developer, 3-5 years, SQL and AWS, bachelor degree";
    let resume = "Bachelor in CS. 4 years of Python, SQL, AWS. Improved latency by 30%.";

    let report = ats_scorer::score(jd, resume);

    assert_eq!(report.fraction(Category::Skills), 1.0);
    assert_eq!(report.fraction(Category::Experience), 1.0);
    assert_eq!(report.fraction(Category::Education), 1.0);
    assert_eq!(report.fraction(Category::Achievements), 1.0);
    assert!(report.gaps.missing_skills.is_empty());
}

#[test]
fn empty_inputs_do_not_panic() {
    let report = ats_scorer::score("", "");
    assert!(report.total_score >= 0.0 && report.total_score <= 100.0);
    assert_eq!(report.fraction(Category::Skills), 1.0);
}
