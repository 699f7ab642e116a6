//! Late-return analysis over borrow and return transactions

use crate::dataset::{BorrowTransaction, ReturnTransaction, Student};
use crate::report::writer_with_header;
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

pub const LATE_RETURNS_FILE: &str = "late_returns.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One student with their late-return count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LateReturnCount {
    #[serde(rename = "studentId")]
    pub student_id: String,
    pub name: String,
    pub late_count: usize,
}

fn parse_timestamp(value: &str) -> crate::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp {value:?}"))
}

/// Count late returns per student, most overdue first.
///
/// Returns are matched to their borrow transaction; a return is late iff
/// it happened strictly after the due date. Returns without a matching
/// borrow are ignored. Malformed timestamps abort the run.
pub fn count_late_returns(
    borrows: &[BorrowTransaction],
    returns: &[ReturnTransaction],
    students: &[Student],
) -> crate::Result<Vec<LateReturnCount>> {
    let borrow_index: HashMap<&str, &BorrowTransaction> = borrows
        .iter()
        .map(|borrow| (borrow.id.as_str(), borrow))
        .collect();
    let student_names: HashMap<&str, &str> = students
        .iter()
        .map(|student| (student.id.as_str(), student.name.as_str()))
        .collect();

    let mut late_counts: HashMap<&str, usize> = HashMap::new();
    for returned in returns {
        let Some(borrow) = borrow_index.get(returned.borrow_id.as_str()) else {
            continue;
        };
        let due_date = parse_timestamp(&borrow.due_date)?;
        let returned_at = parse_timestamp(&returned.returned_at)?;
        if returned_at > due_date {
            *late_counts.entry(borrow.student_id.as_str()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<LateReturnCount> = late_counts
        .into_iter()
        .map(|(student_id, late_count)| LateReturnCount {
            student_id: student_id.to_string(),
            name: student_names
                .get(student_id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            late_count,
        })
        .collect();

    counts.sort_by(|a, b| {
        b.late_count
            .cmp(&a.late_count)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });
    Ok(counts)
}

pub fn write_late_return_report(counts: &[LateReturnCount], path: &Path) -> crate::Result<()> {
    let mut writer = writer_with_header(path, &["studentId", "name", "late_count"])?;
    for count in counts {
        writer
            .serialize(count)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
