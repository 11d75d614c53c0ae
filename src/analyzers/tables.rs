//! Generic rows × named columns views of the derived structures, used by the
//! HTML renderer and the CSV writer.

use serde::Serialize;

use crate::analyzers::types::{
    CategoryLabel, PercentageTable, StudentRecord, SummaryStatistics, SummaryTable,
};
use crate::config::ColumnNames;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Headers follow `columns`, so a sheet with its own column names gets the
/// same names back in every table.
pub trait Tabular {
    fn to_table(&self, columns: &ColumnNames) -> Table;
}

fn category_columns(columns: &ColumnNames) -> Vec<String> {
    std::iter::once(columns.subject.clone())
        .chain(CategoryLabel::ALL.iter().map(|l| l.to_string()))
        .collect()
}

impl Tabular for SummaryTable {
    fn to_table(&self, columns: &ColumnNames) -> Table {
        Table {
            columns: category_columns(columns),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    std::iter::once(row.subject.clone())
                        .chain(row.counts.iter().map(|n| n.to_string()))
                        .collect()
                })
                .collect(),
        }
    }
}

impl Tabular for PercentageTable {
    fn to_table(&self, columns: &ColumnNames) -> Table {
        Table {
            columns: category_columns(columns),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    std::iter::once(row.subject.clone())
                        .chain(row.percentages.iter().map(|p| {
                            if row.is_defined() {
                                format!("{p:.2}")
                            } else {
                                "-".to_string()
                            }
                        }))
                        .collect()
                })
                .collect(),
        }
    }
}

/// Student lists (failing, weak) under the sheet's own column headers.
impl Tabular for [StudentRecord] {
    fn to_table(&self, columns: &ColumnNames) -> Table {
        Table {
            columns: vec![
                columns.student_name.clone(),
                columns.subject.clone(),
                columns.score.clone(),
            ],
            rows: self
                .iter()
                .map(|r| {
                    vec![
                        r.student_name.clone(),
                        r.subject.clone(),
                        format_score(r.score),
                    ]
                })
                .collect(),
        }
    }
}

impl Tabular for SummaryStatistics {
    fn to_table(&self, _columns: &ColumnNames) -> Table {
        let rows = [
            ("مجموع الدرجات", format_score(self.total)),
            ("عدد الطلاب", self.count.to_string()),
            ("المتوسط", format!("{:.2}", self.mean)),
            ("الوسيط", format_score(self.median)),
            ("المنوال", format_score(self.mode)),
            ("أعلى درجة", format_score(self.max)),
            ("أدنى درجة", format_score(self.min)),
            ("نسبة النجاح", format!("{:.2}%", self.pass_percent)),
            ("نسبة الرسوب", format!("{:.2}%", self.fail_percent)),
        ];
        Table {
            columns: vec!["الإحصائية".to_string(), "القيمة".to_string()],
            rows: rows
                .into_iter()
                .map(|(name, value)| vec![name.to_string(), value])
                .collect(),
        }
    }
}

/// Whole scores print without a fractional part.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.2}")
    }
}
