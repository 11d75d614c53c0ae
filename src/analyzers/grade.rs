use crate::analyzers::types::CategoryLabel;
use crate::config::GradeBands;

/// Converts a score into its performance category using the default bands.
///
/// | Range       | Category  |
/// |-------------|-----------|
/// | >= 85       | Excellent |
/// | >= 65       | Advanced  |
/// | >= 50       | Competent |
/// | < 50        | Fail      |
pub fn classify(score: f64) -> CategoryLabel {
    GradeBands::default().classify(score)
}

impl GradeBands {
    /// Lower bounds are inclusive, so 100 lands in Excellent. Scores above
    /// the scale stay Excellent and negative scores stay Fail; the loader
    /// decides whether such scores reach this point at all.
    pub fn classify(&self, score: f64) -> CategoryLabel {
        match score {
            s if s >= self.excellent => CategoryLabel::Excellent,
            s if s >= self.advanced => CategoryLabel::Advanced,
            s if s >= self.competent => CategoryLabel::Competent,
            _ => CategoryLabel::Fail,
        }
    }
}
