//! CSV parser for uploaded result sheets.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::analyzers::types::StudentRecord;
use crate::config::{GradeBands, OutOfRangePolicy, ReportConfig};
use crate::error::{ReportError, Result};

/// Decodes a result sheet into student records using the configured column
/// headers. Extra columns are ignored.
///
/// # Errors
///
/// Returns [`ReportError::InvalidInput`] if a required column is missing, a
/// score cell is blank or not numeric, or a score is out of range under
/// [`OutOfRangePolicy::Reject`].
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn parse_records(bytes: &[u8], config: &ReportConfig) -> Result<Vec<StudentRecord>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let columns = &config.columns;
    let name_idx = column_index(&headers, &columns.student_name)?;
    let subject_idx = column_index(&headers, &columns.subject)?;
    let score_idx = column_index(&headers, &columns.score)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        // 1-based, counting data rows only
        let line = i + 1;

        let cell = |idx: usize, column: &str| -> Result<String> {
            row.get(idx).map(str::to_string).ok_or_else(|| {
                ReportError::InvalidInput(format!("row {line}: missing value for '{column}'"))
            })
        };

        let student_name = cell(name_idx, &columns.student_name)?;
        let subject = cell(subject_idx, &columns.subject)?;
        let raw_score = cell(score_idx, &columns.score)?;
        let score = parse_score(&raw_score, line)?;
        let score = apply_range_policy(score, &config.bands, config.out_of_range, line)?;

        records.push(StudentRecord {
            student_name,
            subject,
            score,
        });
    }

    debug!(rows = records.len(), "Result sheet parsed");
    Ok(records)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == name)
        .ok_or_else(|| ReportError::InvalidInput(format!("required column '{name}' is missing")))
}

fn parse_score(raw: &str, line: usize) -> Result<f64> {
    if raw.is_empty() {
        return Err(ReportError::InvalidInput(format!("row {line}: score is blank")));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ReportError::InvalidInput(format!(
            "row {line}: score '{raw}' is not a number"
        ))),
    }
}

fn apply_range_policy(
    score: f64,
    bands: &GradeBands,
    policy: OutOfRangePolicy,
    line: usize,
) -> Result<f64> {
    let (lo, hi) = (GradeBands::MIN_SCORE, bands.max_score);
    if (lo..=hi).contains(&score) {
        return Ok(score);
    }
    match policy {
        OutOfRangePolicy::Reject => Err(ReportError::InvalidInput(format!(
            "row {line}: score {score} is outside {lo}..={hi}"
        ))),
        OutOfRangePolicy::Clamp => {
            warn!(line, score, "Clamping out-of-range score");
            Ok(score.clamp(lo, hi))
        }
        OutOfRangePolicy::PassThrough => Ok(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "اسم الطالب,المادة,الدرجة\nA,Math,45\nB,Math,60\nC,Math,90\nD,Science,30\n";

    #[test]
    fn test_parse_default_arabic_headers() {
        let records = parse_records(SHEET.as_bytes(), &ReportConfig::default()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0], StudentRecord::new("A", "Math", 45.0));
        assert_eq!(records[3].subject, "Science");
    }

    #[test]
    fn test_parse_with_bom_and_extra_columns() {
        let sheet = "\u{feff}الرقم, اسم الطالب ,المادة,الدرجة\n1,Huda,Math,88.5\n";
        let records = parse_records(sheet.as_bytes(), &ReportConfig::default()).unwrap();
        assert_eq!(records, vec![StudentRecord::new("Huda", "Math", 88.5)]);
    }

    #[test]
    fn test_missing_column_is_invalid_input() {
        let sheet = "اسم الطالب,المادة\nA,Math\n";
        let err = parse_records(sheet.as_bytes(), &ReportConfig::default()).unwrap_err();
        match err {
            ReportError::InvalidInput(msg) => assert!(msg.contains("الدرجة")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_score_is_invalid_input() {
        let sheet = "اسم الطالب,المادة,الدرجة\nA,Math,absent\n";
        let err = parse_records(sheet.as_bytes(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(msg) if msg.contains("row 1")));
    }

    #[test]
    fn test_blank_score_is_invalid_input() {
        let sheet = "اسم الطالب,المادة,الدرجة\nA,Math,45\nB,Math,\n";
        let err = parse_records(sheet.as_bytes(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(msg) if msg.contains("row 2")));
    }

    #[test]
    fn test_header_only_sheet_parses_to_empty() {
        let sheet = "اسم الطالب,المادة,الدرجة\n";
        let records = parse_records(sheet.as_bytes(), &ReportConfig::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_out_of_range_policies() {
        let sheet = "اسم الطالب,المادة,الدرجة\nA,Math,104\n";

        let reject = ReportConfig::default();
        assert!(parse_records(sheet.as_bytes(), &reject).is_err());

        let clamp = ReportConfig {
            out_of_range: OutOfRangePolicy::Clamp,
            ..ReportConfig::default()
        };
        assert_eq!(parse_records(sheet.as_bytes(), &clamp).unwrap()[0].score, 100.0);

        let pass = ReportConfig {
            out_of_range: OutOfRangePolicy::PassThrough,
            ..ReportConfig::default()
        };
        assert_eq!(parse_records(sheet.as_bytes(), &pass).unwrap()[0].score, 104.0);
    }

    #[test]
    fn test_custom_column_names() {
        let mut config = ReportConfig::default();
        config.columns.student_name = "Name".into();
        config.columns.subject = "Subject".into();
        config.columns.score = "Score".into();

        let sheet = "Name,Subject,Score\nSara,Physics,77\n";
        let records = parse_records(sheet.as_bytes(), &config).unwrap();
        assert_eq!(records, vec![StudentRecord::new("Sara", "Physics", 77.0)]);
    }
}
