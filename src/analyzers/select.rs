use crate::analyzers::types::StudentRecord;

/// Default cut-off below which a student counts as weak in a subject.
pub const DEFAULT_WEAK_THRESHOLD: f64 = 50.0;

/// Records for `subject` scoring strictly below `threshold`, in input order.
pub fn weak_students(
    records: &[StudentRecord],
    subject: &str,
    threshold: f64,
) -> Vec<StudentRecord> {
    records
        .iter()
        .filter(|r| r.subject == subject && r.score < threshold)
        .cloned()
        .collect()
}
