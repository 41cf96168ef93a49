use std::fmt;

use chrono::{Local, NaiveDate};

use super::TaskAnnotation;
use crate::models::task::Priority;

/// Whether an annotation deserves a badge row: any field beyond the
/// defaults. Medium priority alone does not count; it is the default.
pub fn has_notable_metadata(annotation: &TaskAnnotation) -> bool {
    annotation.priority.is_some_and(|p| p != Priority::Medium)
        || annotation.due_date.is_some()
        || annotation.tags.as_ref().is_some_and(|t| !t.is_empty())
        || annotation.recurrence_pattern.is_some()
}

/// Display bucket for a due date, relative to some "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueLabel {
    Today,
    Tomorrow,
    /// Days past due; only for incomplete tasks.
    Overdue(i64),
    /// Any other parseable date, shown as a short month/day label.
    Date(NaiveDate),
    /// Unparseable input, echoed back untouched.
    Raw(String),
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::Today => f.write_str("Today"),
            DueLabel::Tomorrow => f.write_str("Tomorrow"),
            DueLabel::Overdue(days) => write!(f, "{}d overdue", days),
            DueLabel::Date(date) => write!(f, "{}", date.format("%b %-d")),
            DueLabel::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Classifies a captured due-date value against `today`. Completed tasks
/// never read as overdue; their past dates fall through to the plain
/// date label.
pub fn classify_due(raw: &str, completed: bool, today: NaiveDate) -> DueLabel {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("today") {
        return DueLabel::Today;
    }
    if value.eq_ignore_ascii_case("tomorrow") {
        return DueLabel::Tomorrow;
    }
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return DueLabel::Raw(value.to_string());
    };
    let days_past = (today - date).num_days();
    match days_past {
        0 => DueLabel::Today,
        -1 => DueLabel::Tomorrow,
        d if d > 0 && !completed => DueLabel::Overdue(d),
        _ => DueLabel::Date(date),
    }
}

/// Label for the current local date; what renderers actually print.
pub fn due_label(raw: &str, completed: bool) -> String {
    classify_due(raw, completed, Local::now().date_naive()).to_string()
}
