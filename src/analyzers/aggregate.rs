use crate::analyzers::types::{
    Analysis, CategoryLabel, ChartSeries, ClassifiedRecord, PercentageTable, StackedSeries,
    StudentRecord, SubjectCounts, SubjectPercentages, SummaryStatistics, SummaryTable,
};
use crate::analyzers::utility::{mean, median, mode, pct};
use crate::config::{GradeBands, PassRule, ReportConfig};
use crate::error::{ReportError, Result};
use tracing::debug;

/// Classifies every record against `bands`, preserving input order.
pub fn classify_all<'a>(
    records: &'a [StudentRecord],
    bands: &GradeBands,
) -> Vec<ClassifiedRecord<'a>> {
    records
        .iter()
        .map(|record| ClassifiedRecord {
            record,
            label: bands.classify(record.score),
        })
        .collect()
}

/// Aggregates a result sheet into count and percentage tables, the failing
/// list and overall statistics.
///
/// # Errors
///
/// [`ReportError::EmptyInput`] for an empty sheet and
/// [`ReportError::InvalidInput`] when the config does not validate or a
/// score is not a finite number.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn aggregate(records: &[StudentRecord], config: &ReportConfig) -> Result<Analysis> {
    config.validate()?;
    if records.is_empty() {
        return Err(ReportError::EmptyInput);
    }
    if let Some(bad) = records.iter().find(|r| !r.score.is_finite()) {
        return Err(ReportError::InvalidInput(format!(
            "score for {} in {} is not a number",
            bad.student_name, bad.subject
        )));
    }

    let classified = classify_all(records, &config.bands);

    let summary = SummaryTable::from_classified(&classified);
    let percentages = PercentageTable::from_summary(&summary);
    let failing: Vec<StudentRecord> = classified
        .iter()
        .filter(|c| c.label == CategoryLabel::Fail)
        .map(|c| c.record.clone())
        .collect();
    let statistics = SummaryStatistics::from_classified(&classified, &config.pass_rule);

    debug!(
        subjects = summary.rows.len(),
        failing = failing.len(),
        mean = statistics.mean,
        "Aggregation complete"
    );

    Ok(Analysis {
        summary,
        percentages,
        failing,
        statistics,
    })
}

impl SummaryTable {
    /// Counts records per (subject, category). Subjects keep the order in
    /// which they first appear.
    pub fn from_classified(classified: &[ClassifiedRecord<'_>]) -> Self {
        let mut rows: Vec<SubjectCounts> = Vec::new();

        for c in classified {
            let subject = &c.record.subject;
            let row = match rows.iter().position(|r| &r.subject == subject) {
                Some(i) => &mut rows[i],
                None => {
                    rows.push(SubjectCounts {
                        subject: subject.clone(),
                        counts: [0; 4],
                    });
                    let last = rows.len() - 1;
                    &mut rows[last]
                }
            };
            row.counts[c.label.index()] += 1;
        }

        Self { rows }
    }

    pub fn row(&self, subject: &str) -> Option<&SubjectCounts> {
        self.rows.iter().find(|r| r.subject == subject)
    }

    pub fn subjects(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.subject.clone()).collect()
    }

    /// Number of records per category across all subjects.
    pub fn category_totals(&self) -> [usize; 4] {
        let mut totals = [0usize; 4];
        for row in &self.rows {
            for (total, count) in totals.iter_mut().zip(row.counts) {
                *total += count;
            }
        }
        totals
    }

    /// Pie/ring input: one slice per category, in category order.
    pub fn category_series(&self) -> Vec<(CategoryLabel, f64)> {
        CategoryLabel::ALL
            .iter()
            .zip(self.category_totals())
            .map(|(label, n)| (*label, n as f64))
            .collect()
    }

    pub fn stacked_series(&self) -> StackedSeries {
        StackedSeries {
            subjects: self.subjects(),
            series: CategoryLabel::ALL
                .iter()
                .map(|label| ChartSeries {
                    label: *label,
                    values: self.rows.iter().map(|r| r.count(*label) as f64).collect(),
                })
                .collect(),
        }
    }
}

impl PercentageTable {
    /// Divides each count row by its total. Rows without records come out as
    /// all zeros with `total == 0`.
    pub fn from_summary(summary: &SummaryTable) -> Self {
        let rows = summary
            .rows
            .iter()
            .map(|row| {
                let total = row.total();
                let mut percentages = [0.0; 4];
                for (p, count) in percentages.iter_mut().zip(row.counts) {
                    *p = pct(count, total);
                }
                SubjectPercentages {
                    subject: row.subject.clone(),
                    total,
                    percentages,
                }
            })
            .collect();

        Self { rows }
    }

    pub fn row(&self, subject: &str) -> Option<&SubjectPercentages> {
        self.rows.iter().find(|r| r.subject == subject)
    }

    pub fn stacked_series(&self) -> StackedSeries {
        StackedSeries {
            subjects: self.rows.iter().map(|r| r.subject.clone()).collect(),
            series: CategoryLabel::ALL
                .iter()
                .map(|label| ChartSeries {
                    label: *label,
                    values: self.rows.iter().map(|r| r.percentage(*label)).collect(),
                })
                .collect(),
        }
    }
}

impl SummaryStatistics {
    /// Statistics over raw scores plus the pass/fail split decided by `rule`.
    /// An empty input yields an all-zero record.
    pub fn from_classified(classified: &[ClassifiedRecord<'_>], rule: &PassRule) -> Self {
        let scores: Vec<f64> = classified.iter().map(|c| c.record.score).collect();
        let count = scores.len();

        let passed = classified
            .iter()
            .filter(|c| match rule {
                PassRule::NotFail => c.label != CategoryLabel::Fail,
                PassRule::Above { threshold } => c.record.score > *threshold,
            })
            .count();
        let pass_percent = pct(passed, count);
        let fail_percent = if count == 0 { 0.0 } else { 100.0 - pass_percent };

        let max = scores.iter().copied().reduce(f64::max).unwrap_or(0.0);
        let min = scores.iter().copied().reduce(f64::min).unwrap_or(0.0);

        Self {
            total: scores.iter().sum(),
            count,
            mean: mean(&scores),
            median: median(&scores),
            mode: mode(&scores),
            max,
            min,
            pass_percent,
            fail_percent,
        }
    }
}
