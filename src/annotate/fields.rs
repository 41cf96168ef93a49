//! Per-field extractors for the annotation grammar. Each one is total:
//! it either finds a value in its accepted set or reports `None`.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::task::{Priority, Recurrence};

static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[priority[:\s]*(\w+)\]|priority[:\s]*(\w+)").unwrap()
});

// Both the bracketed and the bare form take the same constrained value:
// an ISO date or the words today/tomorrow. Anything else is not a due date.
static DUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[due[:\s]*(\d{4}-\d{2}-\d{2}|today|tomorrow)\s*\]|due[:\s]*(\d{4}-\d{2}-\d{2}|today|tomorrow)").unwrap()
});

static TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[tags[:\s]*([^\]]+)\]").unwrap());

static RECURRENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[recur(?:rence)?[:\s]*(\w+)\]|repeats?\s+(\w+)").unwrap()
});

/// `[priority: X]` or bare `priority: X`, accepted only for the four
/// known levels.
pub fn priority(text: &str) -> Option<Priority> {
    let caps = PRIORITY_RE.captures(text)?;
    let word = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Priority::parse(word)
}

/// `[due: Y]` or bare `due: Y` with `Y` an ISO `YYYY-MM-DD` date or the
/// words `today`/`tomorrow`. Word forms come back lowercased; dates are
/// kept exactly as written (interpretation happens at display time).
pub fn due_date(text: &str) -> Option<String> {
    let caps = DUE_RE.captures(text)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Some(value.to_ascii_lowercase())
}

/// `[tags: a, b, ...]`: split on commas, each entry trimmed and
/// lowercased, empties dropped. `None` when nothing usable remains.
pub fn tags(text: &str) -> Option<Vec<String>> {
    let caps = TAGS_RE.captures(text)?;
    let list: Vec<String> = caps
        .get(1)?
        .as_str()
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if list.is_empty() { None } else { Some(list) }
}

/// `[recurrence: R]`, `[recur: R]`, or bare `repeats R`, accepted only
/// for daily/weekly/monthly.
pub fn recurrence(text: &str) -> Option<Recurrence> {
    let caps = RECURRENCE_RE.captures(text)?;
    let word = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Recurrence::parse(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_bracketed_and_bare() {
        assert_eq!(priority("[priority:high]"), Some(Priority::High));
        assert_eq!(priority("[priority: Critical]"), Some(Priority::Critical));
        assert_eq!(priority("priority: low"), Some(Priority::Low));
        assert_eq!(priority("PRIORITY HIGH"), Some(Priority::High));
    }

    #[test]
    fn test_priority_outside_accepted_set_is_ignored() {
        assert_eq!(priority("[priority:urgent]"), None);
        assert_eq!(priority("no fields here"), None);
    }

    #[test]
    fn test_due_date_forms() {
        assert_eq!(due_date("[due:2024-02-15]"), Some("2024-02-15".to_string()));
        assert_eq!(due_date("[due: today]"), Some("today".to_string()));
        assert_eq!(due_date("due: Tomorrow"), Some("tomorrow".to_string()));
        assert_eq!(due_date("due 2025-01-01 sharp"), Some("2025-01-01".to_string()));
    }

    #[test]
    fn test_due_date_rejects_freeform_text() {
        // The bracket form takes the same constrained values as the bare form.
        assert_eq!(due_date("[due: next week]"), None);
        assert_eq!(due_date("[due: 2024-9-15]"), None);
        assert_eq!(due_date("overdue feelings"), None);
    }

    #[test]
    fn test_tags_split_trim_lowercase() {
        assert_eq!(
            tags("[tags: Work , URGENT,home]"),
            Some(vec![
                "work".to_string(),
                "urgent".to_string(),
                "home".to_string()
            ])
        );
    }

    #[test]
    fn test_tags_all_empty_entries_yield_none() {
        assert_eq!(tags("[tags: , ,]"), None);
        assert_eq!(tags("tags: work"), None); // no bare form for tags
    }

    #[test]
    fn test_recurrence_forms() {
        assert_eq!(recurrence("[recurrence:weekly]"), Some(Recurrence::Weekly));
        assert_eq!(recurrence("[recur: daily]"), Some(Recurrence::Daily));
        assert_eq!(recurrence("repeats monthly"), Some(Recurrence::Monthly));
        assert_eq!(recurrence("repeat weekly"), Some(Recurrence::Weekly));
    }

    #[test]
    fn test_recurrence_outside_accepted_set_is_ignored() {
        assert_eq!(recurrence("[recur: yearly]"), None);
        assert_eq!(recurrence("repeats sometimes"), None);
    }
}
