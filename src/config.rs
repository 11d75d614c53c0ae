//! Report configuration.
//!
//! Stored as a JSON object on disk; every field is optional and falls back to
//! the defaults used by the school's Arabic result sheets:
//! ```json
//! {
//!   "columns": { "student_name": "اسم الطالب", "subject": "المادة", "score": "الدرجة" },
//!   "bands": { "competent": 50, "advanced": 65, "excellent": 85, "max_score": 100 },
//!   "pass_rule": { "kind": "above", "threshold": 40 },
//!   "out_of_range": "clamp",
//!   "weak_threshold": 50
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ReportError, Result};

/// Header names of the three required input columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub student_name: String,
    pub subject: String,
    pub score: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            student_name: "اسم الطالب".to_string(),
            subject: "المادة".to_string(),
            score: "الدرجة".to_string(),
        }
    }
}

/// Lower bounds of the upper three categories plus the top of the scale.
///
/// | Range                    | Category  |
/// |--------------------------|-----------|
/// | < competent              | Fail      |
/// | competent ..< advanced   | Competent |
/// | advanced ..< excellent   | Advanced  |
/// | excellent ..= max_score  | Excellent |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeBands {
    pub competent: f64,
    pub advanced: f64,
    pub excellent: f64,
    pub max_score: f64,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            competent: 50.0,
            advanced: 65.0,
            excellent: 85.0,
            max_score: 100.0,
        }
    }
}

impl GradeBands {
    /// Lowest valid score. Scores are never negative.
    pub const MIN_SCORE: f64 = 0.0;
}

/// How the pass percentage in the summary statistics is decided.
///
/// Kept separate from [`GradeBands`]: some result sheets count a student as
/// passing above 40 while the Fail category still ends at 50.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassRule {
    /// Passing means not classified as Fail.
    #[default]
    NotFail,
    /// Passing means `score > threshold`. The comparison is strict, so with
    /// a threshold equal to the Competent boundary a score sitting exactly on
    /// it counts against the pass rate while staying out of the failing list.
    Above { threshold: f64 },
}

/// What the loader does with scores outside `[0, max_score]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    #[default]
    Reject,
    Clamp,
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub columns: ColumnNames,
    pub bands: GradeBands,
    pub pass_rule: PassRule,
    pub out_of_range: OutOfRangePolicy,
    pub weak_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            bands: GradeBands::default(),
            pass_rule: PassRule::default(),
            out_of_range: OutOfRangePolicy::default(),
            weak_threshold: crate::analyzers::select::DEFAULT_WEAK_THRESHOLD,
        }
    }
}

impl ReportConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&content)
            .map_err(|e| ReportError::InvalidInput(format!("config {path}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the bands are finite and strictly ascending and that the
    /// thresholds are usable numbers.
    pub fn validate(&self) -> Result<()> {
        let b = &self.bands;
        let bounds = [
            GradeBands::MIN_SCORE,
            b.competent,
            b.advanced,
            b.excellent,
            b.max_score,
        ];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(ReportError::InvalidInput(
                "grade bands must be finite numbers".into(),
            ));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ReportError::InvalidInput(format!(
                "grade bands must ascend strictly: 0 < {} < {} < {} < {}",
                b.competent, b.advanced, b.excellent, b.max_score
            )));
        }
        if !self.weak_threshold.is_finite() {
            return Err(ReportError::InvalidInput(
                "weak_threshold must be a finite number".into(),
            ));
        }
        if let PassRule::Above { threshold } = self.pass_rule {
            if !threshold.is_finite() {
                return Err(ReportError::InvalidInput(
                    "pass_rule threshold must be a finite number".into(),
                ));
            }
            warn!(
                pass_threshold = threshold,
                fail_boundary = b.competent,
                "Pass rule compares score > threshold while the Fail category ends at its boundary; pass rate and failing list may not agree"
            );
        }
        Ok(())
    }
}
