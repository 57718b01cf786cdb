//! Weighted aggregation of category fractions into a 0-100 score and a decision

use crate::config::{CategoryWeights, DecisionThresholds};
use crate::processing::category_scorer::{clamp_fraction, Category, CategoryFractions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hiring recommendation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    StrongFit,
    MediumFit,
    WeakFit,
}

impl Decision {
    /// Band for an already rounded score. Bounds are inclusive; NaN falls to the bottom band.
    pub fn from_score(score: f32, thresholds: &DecisionThresholds) -> Self {
        if score >= thresholds.shortlist {
            Decision::StrongFit
        } else if score >= thresholds.consider {
            Decision::MediumFit
        } else {
            Decision::WeakFit
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::StrongFit => "Strong Fit / Shortlist",
            Decision::MediumFit => "Medium Fit / Consider",
            Decision::WeakFit => "Weak Fit / Reject",
        }
    }

    /// 1 is the best tier.
    pub fn tier(&self) -> u8 {
        match self {
            Decision::StrongFit => 1,
            Decision::MediumFit => 2,
            Decision::WeakFit => 3,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Decision::StrongFit => "green",
            Decision::MediumFit => "orange",
            Decision::WeakFit => "red",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the breakdown: `points == fraction * weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub fraction: f32,
    pub weight: f32,
    pub points: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total_score: f32,
    pub decision: Decision,
    pub categories: Vec<CategoryScore>,
}

pub struct Aggregator {
    weights: CategoryWeights,
    thresholds: DecisionThresholds,
}

impl Aggregator {
    /// Weights are rescaled to sum to 100 here, once.
    pub fn new(weights: &CategoryWeights, thresholds: DecisionThresholds) -> Self {
        Self {
            weights: weights.normalized(),
            thresholds,
        }
    }

    pub fn aggregate(&self, fractions: &CategoryFractions) -> Aggregate {
        let categories: Vec<CategoryScore> = Category::ALL
            .iter()
            .map(|&category| {
                let fraction = clamp_fraction(fractions.get(&category).copied().unwrap_or(0.0));
                let weight = self.weights.get(category);
                CategoryScore {
                    category,
                    fraction,
                    weight,
                    points: fraction * weight,
                }
            })
            .collect();

        let raw: f32 = categories.iter().map(|c| c.points).sum();
        let total_score = round2(clamp_score(raw));
        let decision = Decision::from_score(total_score, &self.thresholds);

        Aggregate {
            total_score,
            decision,
            categories,
        }
    }
}

fn clamp_score(score: f32) -> f32 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f32) -> f32 {
    ((value as f64 * 100.0).round() / 100.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fractions(value: f32) -> CategoryFractions {
        Category::ALL.iter().map(|&c| (c, value)).collect()
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(&CategoryWeights::default(), DecisionThresholds::default())
    }

    #[test]
    fn test_decision_bands_are_inclusive() {
        let t = DecisionThresholds::default();
        assert_eq!(Decision::from_score(80.0, &t), Decision::StrongFit);
        assert_eq!(Decision::from_score(79.99, &t), Decision::MediumFit);
        assert_eq!(Decision::from_score(60.0, &t), Decision::MediumFit);
        assert_eq!(Decision::from_score(59.99, &t), Decision::WeakFit);
        assert_eq!(Decision::from_score(f32::NAN, &t), Decision::WeakFit);
    }

    #[test]
    fn test_labels_and_tiers() {
        assert_eq!(Decision::StrongFit.label(), "Strong Fit / Shortlist");
        assert_eq!(Decision::MediumFit.to_string(), "Medium Fit / Consider");
        assert_eq!(Decision::WeakFit.tier(), 3);
        assert_eq!(Decision::StrongFit.color(), "green");
    }

    #[test]
    fn test_full_and_empty_fractions() {
        let full = aggregator().aggregate(&fractions(1.0));
        assert_eq!(full.total_score, 100.0);
        assert_eq!(full.decision, Decision::StrongFit);

        let empty = aggregator().aggregate(&fractions(0.0));
        assert_eq!(empty.total_score, 0.0);
        assert_eq!(empty.decision, Decision::WeakFit);
    }

    #[test]
    fn test_points_equal_fraction_times_weight() {
        let mut f = fractions(0.5);
        f.insert(Category::Skills, 2.0 / 3.0);
        let result = aggregator().aggregate(&f);

        assert_eq!(result.categories.len(), 8);
        for row in &result.categories {
            assert!((row.points - row.fraction * row.weight).abs() < 1e-5);
        }
        let skills = &result.categories[0];
        assert_eq!(skills.category, Category::Skills);
        assert!((skills.points - 16.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_total_is_rounded_to_two_decimals() {
        let mut f = fractions(0.0);
        f.insert(Category::Skills, 2.0 / 3.0);
        let result = aggregator().aggregate(&f);
        assert_eq!(result.total_score, 16.67);
    }

    #[test]
    fn test_invalid_fractions_are_sanitized() {
        let mut f = fractions(1.0);
        f.insert(Category::Keywords, f32::NAN);
        f.insert(Category::Tools, 3.0);
        f.shift_remove(&Category::Formatting);
        let result = aggregator().aggregate(&f);

        // tools clamps to 1, keywords and formatting count as 0
        assert_eq!(result.total_score, 85.0);
    }

    #[test]
    fn test_custom_weights_are_rescaled() {
        let weights = CategoryWeights {
            skills: 1.0,
            tools: 0.0,
            education: 0.0,
            experience: 1.0,
            soft_skills: 0.0,
            achievements: 0.0,
            formatting: 0.0,
            keywords: 0.0,
        };
        let aggregator = Aggregator::new(&weights, DecisionThresholds::default());
        let mut f = fractions(0.0);
        f.insert(Category::Skills, 1.0);

        let result = aggregator.aggregate(&f);
        assert_eq!(result.total_score, 50.0);
        assert_eq!(result.decision, Decision::WeakFit);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_67), 66.67);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }
}
