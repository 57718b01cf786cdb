//! Configuration management for the ATS scorer

use crate::error::{AtsScorerError, Result};
use crate::processing::category_scorer::Category;
use crate::processing::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub lexicon: Lexicon,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
    pub match_mode: MatchMode,
    /// How many of the JD's most frequent tokens feed the keyword category
    pub keyword_top_n: usize,
    pub experience: ExperienceRules,
    pub thresholds: DecisionThresholds,
    pub section_headers: Vec<String>,
    pub stopwords: Vec<String>,
    /// Jaro-Winkler similarity at which a missing phrase is reported as a likely typo
    pub near_miss_threshold: f32,
}

/// Points per category. Weights are rescaled to sum to 100 before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub skills: f32,
    pub tools: f32,
    pub education: f32,
    pub experience: f32,
    pub soft_skills: f32,
    pub achievements: f32,
    pub formatting: f32,
    pub keywords: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain substring containment on normalized text
    #[default]
    Substring,
    /// Phrase must start and end on a word boundary
    WordBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceRules {
    /// Lowest credit a resume with some stated years can get
    pub floor: f32,
    /// Deducted per missing year against an open-ended "N+ years" requirement
    pub open_ended_penalty: f32,
    /// Deducted per year of distance outside a closed range
    pub range_penalty: f32,
}

/// Inclusive lower bounds of the decision bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    pub shortlist: f32,
    pub consider: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub enable_caching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Csv,
    Html,
    Pdf,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            match_mode: MatchMode::Substring,
            keyword_top_n: 30,
            experience: ExperienceRules::default(),
            thresholds: DecisionThresholds::default(),
            section_headers: ["experience", "education", "skills"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            stopwords: default_stopwords(),
            near_miss_threshold: 0.9,
        }
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            skills: 25.0,
            tools: 15.0,
            education: 10.0,
            experience: 20.0,
            soft_skills: 10.0,
            achievements: 5.0,
            formatting: 5.0,
            keywords: 10.0,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f32 {
        match category {
            Category::Skills => self.skills,
            Category::Tools => self.tools,
            Category::Education => self.education,
            Category::Experience => self.experience,
            Category::SoftSkills => self.soft_skills,
            Category::Achievements => self.achievements,
            Category::Formatting => self.formatting,
            Category::Keywords => self.keywords,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut f32 {
        match category {
            Category::Skills => &mut self.skills,
            Category::Tools => &mut self.tools,
            Category::Education => &mut self.education,
            Category::Experience => &mut self.experience,
            Category::SoftSkills => &mut self.soft_skills,
            Category::Achievements => &mut self.achievements,
            Category::Formatting => &mut self.formatting,
            Category::Keywords => &mut self.keywords,
        }
    }

    pub fn total(&self) -> f32 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Rescale so the weights sum to exactly 100.
    ///
    /// Callers validate first; a zero or non-finite total leaves the table unchanged.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 || (total - 100.0).abs() < 1e-4 {
            return *self;
        }

        let mut scaled = *self;
        for category in Category::ALL {
            *scaled.get_mut(category) = self.get(category) / total * 100.0;
        }
        scaled
    }

    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let weight = self.get(category);
            if !weight.is_finite() || weight < 0.0 {
                return Err(AtsScorerError::Configuration(format!(
                    "Weight for '{}' must be a non-negative number, got {}",
                    category, weight
                )));
            }
        }
        let total = self.total();
        if !total.is_finite() {
            return Err(AtsScorerError::Configuration(format!(
                "Category weights are too large to sum, got total {}",
                total
            )));
        }
        if total <= 0.0 {
            return Err(AtsScorerError::Configuration(
                "At least one category weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExperienceRules {
    fn default() -> Self {
        Self {
            floor: 0.2,
            open_ended_penalty: 0.2,
            range_penalty: 0.15,
        }
    }
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            shortlist: 80.0,
            consider: 60.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { enable_caching: true }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

fn default_stopwords() -> Vec<String> {
    [
        "the", "and", "for", "with", "from", "that", "this", "these", "those", "are", "was",
        "were", "will", "would", "should", "can", "could", "may", "might", "must", "has", "have",
        "had", "you", "your", "our", "ours", "their", "they", "them", "who", "whom", "which",
        "what", "when", "where", "while", "into", "onto", "over", "under", "about", "above",
        "below", "between", "through", "during", "before", "after", "but", "nor", "yet", "not",
        "all", "any", "each", "per", "via", "its", "also", "than", "then", "such", "both",
        "either", "neither", "upon", "within", "without", "able", "etc",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;

        if !(0.0..=1.0).contains(&self.near_miss_threshold) {
            return Err(AtsScorerError::Configuration(format!(
                "near_miss_threshold must lie in [0, 1], got {}",
                self.near_miss_threshold
            )));
        }

        if self.keyword_top_n == 0 {
            return Err(AtsScorerError::Configuration(
                "keyword_top_n must be at least 1".to_string(),
            ));
        }

        let rules = &self.experience;
        for (name, value) in [
            ("floor", rules.floor),
            ("open_ended_penalty", rules.open_ended_penalty),
            ("range_penalty", rules.range_penalty),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AtsScorerError::Configuration(format!(
                    "experience.{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }

        let t = &self.thresholds;
        if !(t.consider.is_finite() && t.shortlist.is_finite()) || t.consider > t.shortlist {
            return Err(AtsScorerError::Configuration(format!(
                "Decision thresholds must satisfy consider <= shortlist, got {} / {}",
                t.consider, t.shortlist
            )));
        }

        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AtsScorerError::Configuration(format!("Failed to parse config '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-scorer")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_hundred() {
        let weights = CategoryWeights::default();
        assert!((weights.total() - 100.0).abs() < 1e-4);
        assert_eq!(weights.normalized(), weights);
    }

    #[test]
    fn test_weights_are_rescaled() {
        let weights = CategoryWeights {
            skills: 1.0,
            tools: 1.0,
            education: 0.0,
            experience: 2.0,
            soft_skills: 0.0,
            achievements: 0.0,
            formatting: 0.0,
            keywords: 0.0,
        };
        let scaled = weights.normalized();
        assert!((scaled.total() - 100.0).abs() < 1e-3);
        assert!((scaled.experience - 50.0).abs() < 1e-3);
        assert!((scaled.skills - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut config = Config::default();
        config.scoring.weights.tools = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_all_zero_weights() {
        let mut config = Config::default();
        config.scoring.weights = CategoryWeights {
            skills: 0.0,
            tools: 0.0,
            education: 0.0,
            experience: 0.0,
            soft_skills: 0.0,
            achievements: 0.0,
            formatting: 0.0,
            keywords: 0.0,
        };
        assert!(matches!(config.validate(), Err(AtsScorerError::Configuration(_))));
    }

    #[test]
    fn test_rejects_weights_whose_total_overflows() {
        let mut config = Config::default();
        config.scoring.weights.skills = f32::MAX;
        config.scoring.weights.tools = f32::MAX;
        assert!(config.scoring.weights.total().is_infinite());
        assert!(matches!(config.validate(), Err(AtsScorerError::Configuration(_))));

        config.scoring.weights.tools = 15.0;
        assert!(config.validate().is_ok());
        let scaled = config.scoring.weights.normalized();
        assert!((scaled.total() - 100.0).abs() < 1e-3);
        assert!((scaled.skills - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_out_of_range_near_miss_threshold() {
        let mut config = Config::default();
        config.scoring.near_miss_threshold = 1.5;
        assert!(config.validate().is_err());
        config.scoring.near_miss_threshold = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.scoring.thresholds = DecisionThresholds { shortlist: 50.0, consider: 70.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.scoring.match_mode = MatchMode::WordBoundary;
        config.scoring.keyword_top_n = 12;
        config.lexicon.skills.push("rust".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scoring.match_mode, MatchMode::WordBoundary);
        assert_eq!(loaded.scoring.keyword_top_n, 12);
        assert!(loaded.lexicon.skills.contains(&"rust".to_string()));
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nkeyword_top_n = 5\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scoring.keyword_top_n, 5);
        assert_eq!(loaded.scoring.weights, CategoryWeights::default());
        assert!(!loaded.lexicon.skills.is_empty());
    }
}
