use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiClientError;
use crate::models::task::{Priority, Task, TaskCreate, TaskUpdate};

pub const TASKS_ENDPOINT: &str = "/api/tasks";
pub const SEARCH_ENDPOINT: &str = "/api/search/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    CreatedAt,
    DueDate,
    Priority,
    Title,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "created_at",
            SortBy::DueDate => "due_date",
            SortBy::Priority => "priority",
            SortBy::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Server-side filtering and ordering for task listings. Everything here
/// is optional; the default filter lists all of the user's tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
    pub has_due_date: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub order: Option<SortOrder>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_due_date(mut self, has_due_date: bool) -> Self {
        self.has_due_date = Some(has_due_date);
        self
    }

    pub fn sort(mut self, sort_by: SortBy, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by);
        self.order = Some(order);
        self
    }

    /// Flattens the filter into query pairs. The `tags` key repeats, one
    /// pair per tag, which is how the backend expects list parameters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        if let Some(has_due_date) = self.has_due_date {
            pairs.push(("has_due_date", has_due_date.to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sort_by", sort_by.as_str().to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.as_str().to_string()));
        }
        pairs
    }
}

impl ApiClient {
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ApiClientError> {
        self.get_query(TASKS_ENDPOINT, &filter.query_pairs(), true)
            .await
    }

    pub async fn create_task(&self, task: &TaskCreate) -> Result<Task, ApiClientError> {
        self.post(TASKS_ENDPOINT, task, true).await
    }

    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task, ApiClientError> {
        self.put(&format!("{}/{}", TASKS_ENDPOINT, id), update, true)
            .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), ApiClientError> {
        let _: Value = self
            .delete(&format!("{}/{}", TASKS_ENDPOINT, id), true)
            .await?;
        Ok(())
    }

    /// Marks a task done. Dedicated endpoint rather than a PUT so the
    /// backend can fan out recurrence bookkeeping.
    pub async fn complete_task(&self, id: i64) -> Result<Task, ApiClientError> {
        self.patch(&format!("{}/{}/complete", TASKS_ENDPOINT, id), true)
            .await
    }

    /// Full-text search across the user's tasks, with the same optional
    /// filters as [`ApiClient::list_tasks`].
    pub async fn search_tasks(
        &self,
        query: &str,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, ApiClientError> {
        let mut pairs = vec![("query", query.to_string())];
        pairs.extend(filter.query_pairs());
        self.get_query(SEARCH_ENDPOINT, &pairs, true).await
    }
}
