//! Output formatting and persistence for analysis results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of tables.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::tables::Table;
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs a table one row per line, columns separated by ` | `.
pub fn print_table(title: &str, table: &Table) {
    info!("{title}");
    info!("{}", table.columns.join(" | "));
    for row in &table.rows {
        info!("{}", row.join(" | "));
    }
}

/// Writes a [`Table`] to a CSV file, replacing any existing file.
///
/// A UTF-8 BOM is written first so spreadsheet tools detect the Arabic headers.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<()> {
    debug!(path = %path.display(), rows = table.rows.len(), "Writing CSV table");

    let mut file = File::create(path)?;
    std::io::Write::write_all(&mut file, "\u{feff}".as_bytes())?;

    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn table() -> Table {
        Table {
            columns: vec!["المادة".into(), "غير مجتاز".into()],
            rows: vec![
                vec!["Math".into(), "1".into()],
                vec!["Science".into(), "2".into()],
            ],
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&table());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&table()).unwrap();
    }

    #[test]
    fn test_write_table_csv() {
        let path = temp_path("exam_report_test_table.csv");
        let _ = fs::remove_file(&path);

        write_table_csv(&path, &table()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "\u{feff}المادة,غير مجتاز");
        assert_eq!(lines[2], "Science,2");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_table_csv_overwrites() {
        let path = temp_path("exam_report_test_overwrite.csv");
        write_table_csv(&path, &table()).unwrap();
        write_table_csv(&path, &table()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
