//! Report assembly: metadata, rendered HTML and the exported document.

pub mod charts;
pub mod html;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::types::{Analysis, StudentRecord};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::export::DocumentExporter;

/// Free-text header fields printed at the top of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub school_name: String,
    pub academic_year: String,
    pub report_type: String,
    pub grade: String,
    pub section: String,
    pub period: String,
}

impl ReportMetadata {
    /// Fields paired with their printed labels, in report order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("اسم المدرسة", self.school_name.as_str()),
            ("العام الدراسي", self.academic_year.as_str()),
            ("نوع التقرير", self.report_type.as_str()),
            ("الصف", self.grade.as_str()),
            ("الفصل", self.section.as_str()),
            ("الفترة", self.period.as_str()),
        ]
    }

    /// Every field must be present; content is not checked further.
    pub fn validate(&self) -> Result<()> {
        match self.fields().iter().find(|(_, v)| v.trim().is_empty()) {
            Some((label, _)) => Err(ReportError::InvalidInput(format!(
                "report field '{label}' is empty"
            ))),
            None => Ok(()),
        }
    }
}

/// Outcome of one report generation. The analysis and HTML are always
/// present; `document` carries the export result separately so an export
/// failure does not discard them.
#[derive(Debug)]
pub struct GeneratedReport {
    pub analysis: Analysis,
    pub html: String,
    pub document: Result<Vec<u8>>,
}

/// Aggregates the records and renders the HTML report.
pub fn build(
    records: &[StudentRecord],
    config: &ReportConfig,
    metadata: &ReportMetadata,
) -> Result<(Analysis, String)> {
    metadata.validate()?;
    let analysis = aggregate(records, config)?;
    let html = html::render(metadata, &analysis, &config.columns)?;
    Ok((analysis, html))
}

/// Builds the report and hands the HTML to `exporter`.
///
/// # Errors
///
/// Fails for input problems ([`ReportError::InvalidInput`],
/// [`ReportError::EmptyInput`]) or [`ReportError::Render`]. Export failures
/// land in [`GeneratedReport::document`].
#[tracing::instrument(skip_all, fields(school = %metadata.school_name, records = records.len()))]
pub async fn generate<E>(
    records: &[StudentRecord],
    config: &ReportConfig,
    metadata: &ReportMetadata,
    exporter: &E,
) -> Result<GeneratedReport>
where
    E: DocumentExporter + ?Sized,
{
    let (analysis, html) = build(records, config, metadata)?;
    info!(html_bytes = html.len(), "Report rendered");

    let document = match exporter.export(&html).await {
        Ok(bytes) => Ok(bytes),
        Err(ReportError::ExportFailed(msg)) => Err(ReportError::ExportFailed(msg)),
        Err(other) => Err(ReportError::ExportFailed(other.to_string())),
    };
    if let Err(e) = &document {
        error!(error = %e, "Document export failed");
    }

    Ok(GeneratedReport {
        analysis,
        html,
        document,
    })
}
