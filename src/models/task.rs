use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "critical" => Some(Priority::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as the backend returns it. Timestamps stay as the backend's
/// ISO 8601 strings; only due dates get interpreted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub recurrence_pattern: Option<Recurrence>,
}

impl Task {
    /// Priority with the backend's default applied for tasks created
    /// before the field existed.
    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<Recurrence>,
}

impl TaskCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = Some(normalize_tags(tags));
        self
    }

    pub fn recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence_pattern = Some(recurrence);
        self
    }

    /// Same checks the backend applies, run locally so bad input never
    /// leaves the process. Collects every failure instead of stopping at
    /// the first one.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        let title = self.title.trim();
        if title.is_empty() {
            details
                .entry("title".to_string())
                .or_default()
                .push("Title is required".to_string());
        } else if title.chars().count() > TITLE_MAX_CHARS {
            details.entry("title".to_string()).or_default().push(format!(
                "Title must be {} characters or less",
                TITLE_MAX_CHARS
            ));
        }

        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                details
                    .entry("description".to_string())
                    .or_default()
                    .push(format!(
                        "Description must be {} characters or less",
                        DESCRIPTION_MAX_CHARS
                    ));
            }
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(ApiError {
                code: "validation_error".to_string(),
                message: "Invalid task".to_string(),
                details: Some(details),
            })
        }
    }
}

/// Partial update. Absent fields are left untouched by the backend;
/// `description` is double-optional so `Some(None)` serializes an explicit
/// null, which is how the edit form clears it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<Recurrence>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = Some(normalize_tags(tags));
        self
    }
}

/// Trims, lowercases, drops empties, and dedupes while keeping first-seen
/// order. Applied to outgoing task payloads; the backend stores tags as-is.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse(" critical "), Some(Priority::Critical));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let err = TaskCreate::new("   ").validate().unwrap_err();
        assert_eq!(err.code, "validation_error");
        let details = err.details.expect("details missing");
        assert_eq!(details["title"], vec!["Title is required".to_string()]);
    }

    #[test]
    fn test_validate_rejects_overlong_fields() {
        let long_title = "x".repeat(TITLE_MAX_CHARS + 1);
        let create = TaskCreate::new(long_title).description("y".repeat(DESCRIPTION_MAX_CHARS + 1));
        let err = create.validate().unwrap_err();
        let details = err.details.expect("details missing");
        assert!(details.contains_key("title"));
        assert!(details.contains_key("description"));
    }

    #[test]
    fn test_normalize_tags_dedupes_preserving_order() {
        let tags = normalize_tags(["Work", " urgent ", "", "work", "HOME"]);
        assert_eq!(tags, vec!["work", "urgent", "home"]);
    }

    #[test]
    fn test_update_serializes_null_to_clear_description() {
        let update = TaskUpdate::new().title("Regroup").description(None);
        let body = serde_json::to_value(&update).expect("Failed to serialize");
        let fields = body.as_object().expect("not an object");
        assert_eq!(fields["title"], "Regroup");
        // The key must be present with an explicit null, not skipped.
        assert_eq!(fields.get("description"), Some(&serde_json::Value::Null));
        assert!(!fields.contains_key("priority"));
    }
}
