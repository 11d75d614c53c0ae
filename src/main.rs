//! CLI entry point for the exam report tool.
//!
//! Provides subcommands for analyzing a result sheet, listing weak students
//! in a subject, and producing the full HTML/PDF report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exam_report::analyzers::tables::Tabular;
use exam_report::analyzers::{aggregate, weak_students};
use exam_report::config::ReportConfig;
use exam_report::export::WkhtmltopdfExporter;
use exam_report::report::{ReportMetadata, generate};
use exam_report::{fetch::load_source, output, parser::parse_records};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "exam_report")]
#[command(about = "Classify exam scores and build student result reports", long_about = None)]
struct Cli {
    /// JSON config with column names, grade bands and pass rule
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print category tables and statistics for a result sheet
    Analyze {
        /// Path or URL of the CSV result sheet
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Print the full analysis as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Directory to write each table as CSV
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// List students below a threshold in one subject
    Weak {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long)]
        subject: String,

        /// Scores strictly below this count as weak (defaults to the config value)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
    /// Render the HTML report and export it to PDF
    Report {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(long)]
        school: String,

        #[arg(long)]
        year: String,

        #[arg(long)]
        report_type: String,

        #[arg(long)]
        grade: String,

        #[arg(long)]
        section: String,

        #[arg(long)]
        period: String,

        /// Where to write the HTML report
        #[arg(long, default_value = "report.html")]
        html: PathBuf,

        /// Where to write the PDF report
        #[arg(long, default_value = "report.pdf")]
        pdf: PathBuf,

        /// Skip PDF export
        #[arg(long, default_value_t = false)]
        no_pdf: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/exam_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("exam_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => ReportConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => ReportConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            source,
            json,
            csv_dir,
        } => {
            let bytes = load_source(&source).await?;
            let records = parse_records(&bytes, &config)?;
            let analysis = aggregate(&records, &config)?;

            if json {
                output::print_json(&analysis)?;
            } else {
                let columns = &config.columns;
                output::print_pretty(&analysis);
                output::print_table("Category counts", &analysis.summary.to_table(columns));
                output::print_table(
                    "Category percentages",
                    &analysis.percentages.to_table(columns),
                );
                output::print_table("Failing students", &analysis.failing.to_table(columns));
                output::print_table("Statistics", &analysis.statistics.to_table(columns));
            }

            if let Some(dir) = csv_dir {
                let columns = &config.columns;
                std::fs::create_dir_all(&dir)?;
                output::write_table_csv(
                    &dir.join("summary.csv"),
                    &analysis.summary.to_table(columns),
                )?;
                output::write_table_csv(
                    &dir.join("percentages.csv"),
                    &analysis.percentages.to_table(columns),
                )?;
                output::write_table_csv(
                    &dir.join("failing.csv"),
                    &analysis.failing.to_table(columns),
                )?;
                output::write_table_csv(
                    &dir.join("statistics.csv"),
                    &analysis.statistics.to_table(columns),
                )?;
                info!(dir = %dir.display(), "CSV tables written");
            }
        }
        Commands::Weak {
            source,
            subject,
            threshold,
        } => {
            let bytes = load_source(&source).await?;
            let records = parse_records(&bytes, &config)?;
            let threshold = threshold.unwrap_or(config.weak_threshold);
            let weak = weak_students(&records, &subject, threshold);

            if weak.is_empty() {
                info!(subject = %subject, threshold, "No students below threshold");
            } else {
                output::print_table(
                    &format!("Below {threshold} in {subject}"),
                    &weak.to_table(&config.columns),
                );
            }
        }
        Commands::Report {
            source,
            school,
            year,
            report_type,
            grade,
            section,
            period,
            html,
            pdf,
            no_pdf,
        } => {
            let metadata = ReportMetadata {
                school_name: school,
                academic_year: year,
                report_type,
                grade,
                section,
                period,
            };
            let bytes = load_source(&source).await?;
            let records = parse_records(&bytes, &config)?;

            let exporter = WkhtmltopdfExporter::from_env();
            if no_pdf {
                let (_, rendered) = exam_report::report::build(&records, &config, &metadata)?;
                std::fs::write(&html, rendered)?;
                info!(path = %html.display(), "HTML report written");
                return Ok(());
            }

            match exporter.locate() {
                Some(path) => info!(path = %path.display(), "Using wkhtmltopdf"),
                None => warn!(binary = %exporter.binary.display(), "wkhtmltopdf not found"),
            }

            let report = generate(&records, &config, &metadata, &exporter).await?;
            std::fs::write(&html, &report.html)?;
            info!(path = %html.display(), "HTML report written");

            match report.document {
                Ok(document) => {
                    std::fs::write(&pdf, document)?;
                    info!(path = %pdf.display(), "PDF report written");
                }
                Err(e) => {
                    error!(error = %e, "PDF export failed; HTML report is still available");
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
