use exam_report::ReportError;
use exam_report::analyzers::tables::Tabular;
use exam_report::analyzers::types::{CategoryLabel, StudentRecord};
use exam_report::analyzers::{aggregate, classify, weak_students};
use exam_report::config::{ColumnNames, ReportConfig};
use exam_report::export::WkhtmltopdfExporter;
use exam_report::parser::parse_records;
use exam_report::report::{ReportMetadata, generate};

fn load_sample() -> Vec<StudentRecord> {
    let bytes = include_bytes!("fixtures/sample_results.csv");
    parse_records(bytes, &ReportConfig::default()).expect("Failed to parse sample sheet")
}

#[test]
fn test_full_pipeline() {
    let records = load_sample();
    let analysis = aggregate(&records, &ReportConfig::default()).unwrap();

    let math = analysis.summary.row("Math").unwrap();
    assert_eq!(math.count(CategoryLabel::Fail), 1);
    assert_eq!(math.count(CategoryLabel::Competent), 1);
    assert_eq!(math.count(CategoryLabel::Advanced), 0);
    assert_eq!(math.count(CategoryLabel::Excellent), 1);

    let science = analysis.summary.row("Science").unwrap();
    assert_eq!(science.counts, [1, 0, 0, 0]);

    let math_pct = analysis.percentages.row("Math").unwrap();
    assert!((math_pct.percentage(CategoryLabel::Fail) - 33.33).abs() < 0.01);
    assert!((math_pct.percentage(CategoryLabel::Competent) - 33.33).abs() < 0.01);
    assert_eq!(math_pct.percentage(CategoryLabel::Advanced), 0.0);
    assert!((math_pct.percentage(CategoryLabel::Excellent) - 33.33).abs() < 0.01);

    let failing: Vec<_> = analysis
        .failing
        .iter()
        .map(|r| (r.student_name.as_str(), r.subject.as_str(), r.score))
        .collect();
    assert_eq!(failing, vec![("A", "Math", 45.0), ("D", "Science", 30.0)]);

    assert_eq!(analysis.statistics.mean, 56.25);
}

#[test]
fn test_tables_partition_every_record() {
    let mut records = load_sample();
    records.push(StudentRecord::new("E", "Science", 100.0));
    records.push(StudentRecord::new("F", "Art", 64.999));
    let analysis = aggregate(&records, &ReportConfig::default()).unwrap();

    for row in &analysis.summary.rows {
        let expected = records.iter().filter(|r| r.subject == row.subject).count();
        assert_eq!(row.total(), expected);
    }
    for row in &analysis.percentages.rows {
        let sum: f64 = row.percentages.iter().sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }
    let counted: usize = analysis.summary.category_totals().iter().sum();
    assert_eq!(counted, records.len());
    assert_eq!(analysis.summary.subjects(), vec!["Math", "Science", "Art"]);
}

#[test]
fn test_classification_boundaries() {
    assert_eq!(classify(49.999), CategoryLabel::Fail);
    assert_eq!(classify(50.0), CategoryLabel::Competent);
    assert_eq!(classify(64.999), CategoryLabel::Competent);
    assert_eq!(classify(65.0), CategoryLabel::Advanced);
    assert_eq!(classify(84.999), CategoryLabel::Advanced);
    assert_eq!(classify(85.0), CategoryLabel::Excellent);
    assert_eq!(classify(100.0), CategoryLabel::Excellent);
}

#[test]
fn test_weak_students_subset_in_order() {
    let records = load_sample();
    let weak = weak_students(&records, "Math", 61.0);
    let names: Vec<_> = weak.iter().map(|r| r.student_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(weak_students(&weak, "Math", 61.0), weak);
}

#[test]
fn test_empty_sheet_is_consistently_rejected() {
    let records =
        parse_records("اسم الطالب,المادة,الدرجة\n".as_bytes(), &ReportConfig::default()).unwrap();
    for _ in 0..2 {
        assert!(matches!(
            aggregate(&records, &ReportConfig::default()),
            Err(ReportError::EmptyInput)
        ));
    }
}

#[test]
fn test_table_views_render_for_presentation() {
    let analysis = aggregate(&load_sample(), &ReportConfig::default()).unwrap();
    let table = analysis.percentages.to_table(&ReportConfig::default().columns);
    assert_eq!(table.columns[0], "المادة");
    assert_eq!(table.rows.len(), 2);

    let columns = ColumnNames {
        subject: "Subject".into(),
        ..ColumnNames::default()
    };
    assert_eq!(analysis.summary.to_table(&columns).columns[0], "Subject");
}

#[tokio::test]
async fn test_report_survives_missing_renderer() {
    let metadata = ReportMetadata {
        school_name: "مدرسة النور".into(),
        academic_year: "2025/2026".into(),
        report_type: "نهائي".into(),
        grade: "السادس".into(),
        section: "أ".into(),
        period: "الثانية".into(),
    };
    let exporter = WkhtmltopdfExporter::new("/nonexistent/exam_report/wkhtmltopdf");

    let report = generate(&load_sample(), &ReportConfig::default(), &metadata, &exporter)
        .await
        .unwrap();

    assert!(matches!(report.document, Err(ReportError::ExportFailed(_))));
    assert!(report.html.contains("مدرسة النور"));
    assert_eq!(report.analysis.failing.len(), 2);
}
