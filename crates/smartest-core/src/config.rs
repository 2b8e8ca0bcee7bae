//! Scoring weights and the on-disk configuration file.
//!
//! Every blend ratio and penalty the scorer uses lives here so tests and
//! users can vary them without touching the engine. The defaults were tuned
//! empirically; only the structure (key element dominates, text similarity
//! corrects) is load-bearing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Weights for yes/no-with-number references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YesNoWeights {
    pub yes_no: f64,
    pub number: f64,
    pub text: f64,
    /// Number sub-score when the candidate gives a different number.
    pub number_mismatch_credit: f64,
}

impl Default for YesNoWeights {
    fn default() -> Self {
        Self {
            yes_no: 0.5,
            number: 0.4,
            text: 0.1,
            number_mismatch_credit: 50.0,
        }
    }
}

/// Key-element versus whole-text blend for structured and numeric references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub key_element: f64,
    pub text: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            key_element: 0.8,
            text: 0.2,
        }
    }
}

/// Structured references: blend plus the fixed tuple mismatch score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredWeights {
    #[serde(flatten)]
    pub blend: BlendWeights,
    /// Key-element score for a tuple that does not match exactly.
    pub tuple_mismatch_score: f64,
}

impl Default for StructuredWeights {
    fn default() -> Self {
        Self {
            blend: BlendWeights::default(),
            tuple_mismatch_score: 20.0,
        }
    }
}

/// Keyword scoring for textual references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordWeights {
    pub keyword: f64,
    pub text: f64,
    /// Penalty when every reference keyword is missing, scaled by the missing share.
    pub miss_weight: f64,
    /// Penalty per keyword the candidate uses that the reference does not.
    pub wrong_weight_each: f64,
    pub wrong_weight_cap: f64,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self {
            keyword: 0.65,
            text: 0.35,
            miss_weight: 25.0,
            wrong_weight_each: 10.0,
            wrong_weight_cap: 30.0,
        }
    }
}

/// Thresholds used only to build feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackThresholds {
    /// Minimum 0–1 similarity for a missing keyword to count as a close match.
    pub fuzzy_threshold: f64,
    pub mostly_present_ratio: f64,
    pub partially_present_ratio: f64,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.8,
            mostly_present_ratio: 0.7,
            partially_present_ratio: 0.4,
        }
    }
}

/// All tunable values of the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub yes_no: YesNoWeights,
    pub structured: StructuredWeights,
    pub numeric: BlendWeights,
    pub keywords: KeywordWeights,
    pub feedback: FeedbackThresholds,
}

impl ScoringConfig {
    /// Check that weights are non-negative and thresholds are in range.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("yes_no.yes_no", self.yes_no.yes_no),
            ("yes_no.number", self.yes_no.number),
            ("yes_no.text", self.yes_no.text),
            ("yes_no.number_mismatch_credit", self.yes_no.number_mismatch_credit),
            ("structured.key_element", self.structured.blend.key_element),
            ("structured.text", self.structured.blend.text),
            ("structured.tuple_mismatch_score", self.structured.tuple_mismatch_score),
            ("numeric.key_element", self.numeric.key_element),
            ("numeric.text", self.numeric.text),
            ("keywords.keyword", self.keywords.keyword),
            ("keywords.text", self.keywords.text),
            ("keywords.miss_weight", self.keywords.miss_weight),
            ("keywords.wrong_weight_each", self.keywords.wrong_weight_each),
            ("keywords.wrong_weight_cap", self.keywords.wrong_weight_cap),
        ];
        for (name, value) in weights {
            anyhow::ensure!(
                value.is_finite() && value >= 0.0,
                "scoring weight {name} must be a non-negative number, got {value}"
            );
        }

        let ratios = [
            ("feedback.fuzzy_threshold", self.feedback.fuzzy_threshold),
            ("feedback.mostly_present_ratio", self.feedback.mostly_present_ratio),
            (
                "feedback.partially_present_ratio",
                self.feedback.partially_present_ratio,
            ),
        ];
        for (name, value) in ratios {
            anyhow::ensure!(
                (0.0..=1.0).contains(&value),
                "{name} must be between 0.0 and 1.0, got {value}"
            );
        }
        anyhow::ensure!(
            self.feedback.partially_present_ratio <= self.feedback.mostly_present_ratio,
            "feedback.partially_present_ratio must not exceed feedback.mostly_present_ratio"
        );
        Ok(())
    }
}

/// Top-level smartest configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmartestConfig {
    /// Scoring weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Keyword lists keyed by topic id; each replaces the built-in list.
    #[serde(default)]
    pub keywords: BTreeMap<String, Vec<String>>,
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `smartest.toml` in the current directory
/// 2. `~/.config/smartest/config.toml`
pub fn load_config() -> Result<SmartestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SmartestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("smartest.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_str(
                &std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?,
                &path,
            )?
        }
        None => SmartestConfig::default(),
    };

    Ok(config)
}

/// Parse and validate a TOML config string.
pub fn parse_config_str(content: &str, source_path: &Path) -> Result<SmartestConfig> {
    let config: SmartestConfig = toml::from_str(content)
        .with_context(|| format!("failed to parse config: {}", source_path.display()))?;
    config
        .scoring
        .validate()
        .with_context(|| format!("invalid scoring section in {}", source_path.display()))?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("smartest"))
}
