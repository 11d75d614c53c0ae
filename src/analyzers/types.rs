//! Data types used by the classification and aggregation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the uploaded result sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_name: String,
    pub subject: String,
    pub score: f64,
}

impl StudentRecord {
    pub fn new(student_name: &str, subject: &str, score: f64) -> Self {
        Self {
            student_name: student_name.to_string(),
            subject: subject.to_string(),
            score,
        }
    }
}

/// Performance category, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryLabel {
    Fail,
    Competent,
    Advanced,
    Excellent,
}

impl CategoryLabel {
    /// All categories in ascending order. Tables and charts always use this order.
    pub const ALL: [CategoryLabel; 4] = [
        CategoryLabel::Fail,
        CategoryLabel::Competent,
        CategoryLabel::Advanced,
        CategoryLabel::Excellent,
    ];

    /// Label printed on the school's reports.
    pub fn arabic(self) -> &'static str {
        match self {
            CategoryLabel::Fail => "غير مجتاز",
            CategoryLabel::Competent => "متمكن",
            CategoryLabel::Advanced => "متقدم",
            CategoryLabel::Excellent => "متفوق",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arabic())
    }
}

/// A record together with the category its score falls into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedRecord<'a> {
    pub record: &'a StudentRecord,
    pub label: CategoryLabel,
}

/// Per-subject count of records in each category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectCounts {
    pub subject: String,
    /// Indexed by [`CategoryLabel::index`].
    pub counts: [usize; 4],
}

impl SubjectCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn count(&self, label: CategoryLabel) -> usize {
        self.counts[label.index()]
    }
}

/// Subject × category count cross-tabulation, subjects in first-appearance order.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SummaryTable {
    pub rows: Vec<SubjectCounts>,
}

/// Per-subject share of records in each category, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectPercentages {
    pub subject: String,
    /// Number of records the row was computed from. A zero total yields an
    /// all-zero row.
    pub total: usize,
    pub percentages: [f64; 4],
}

impl SubjectPercentages {
    pub fn percentage(&self, label: CategoryLabel) -> f64 {
        self.percentages[label.index()]
    }

    /// Whether the row was computed from at least one record.
    pub fn is_defined(&self) -> bool {
        self.total > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PercentageTable {
    pub rows: Vec<SubjectPercentages>,
}

/// Scalar statistics over every score in the sheet, all subjects combined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total: f64,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub max: f64,
    pub min: f64,
    pub pass_percent: f64,
    pub fail_percent: f64,
}

/// Everything derived from one result sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub summary: SummaryTable,
    pub percentages: PercentageTable,
    pub failing: Vec<StudentRecord>,
    pub statistics: SummaryStatistics,
}

/// One named series of a chart, one value per x-axis category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: CategoryLabel,
    pub values: Vec<f64>,
}

/// Input for a stacked bar chart: subjects along the x-axis, one series per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedSeries {
    pub subjects: Vec<String>,
    pub series: Vec<ChartSeries>,
}
