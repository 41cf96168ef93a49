//! Extraction of structured task summaries from assistant chat replies.
//!
//! The agent tends to describe tasks in a loose line format:
//!
//! ```text
//! Task 30: Buy groceries (pending) [priority:high] [due:2024-02-15] [tags:shopping]
//! ```
//!
//! [`parse_annotations`] scans a whole message for that base pattern and
//! runs the [`fields`] extractors over the text between one match and the
//! next. The result is derived per call and never stored; when nothing
//! matches, callers fall back to rendering the raw message.

pub mod badges;
pub mod fields;

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::task::{Priority, Recurrence};

/// One task mentioned in an assistant reply. Optional fields are only
/// present when the message spelled them out in an accepted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAnnotation {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub recurrence_pattern: Option<Recurrence>,
}

static BASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Task (\d+):\s*([^(\[]+)\s*\((pending|completed)\)").unwrap());

struct BaseMatch {
    span: Range<usize>,
    id: i64,
    title: String,
    completed: bool,
}

/// Scans `content` for task lines and returns one annotation per match,
/// in textual order. Total: bad input yields fewer annotations, never an
/// error. An id too large for `i64` drops that match.
pub fn parse_annotations(content: &str) -> Vec<TaskAnnotation> {
    let matches: Vec<BaseMatch> = BASE_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = caps.get(1)?.as_str().parse::<i64>().ok()?;
            let title = caps.get(2)?.as_str().trim().to_string();
            let completed = caps.get(3)?.as_str().eq_ignore_ascii_case("completed");
            Some(BaseMatch {
                span: whole.range(),
                id,
                title,
                completed,
            })
        })
        .collect();

    let mut annotations = Vec::with_capacity(matches.len());
    for (i, base) in matches.iter().enumerate() {
        // Field window: everything after this match, up to the next one.
        let window_end = matches
            .get(i + 1)
            .map_or(content.len(), |next| next.span.start);
        let window = &content[base.span.end..window_end];
        annotations.push(TaskAnnotation {
            id: base.id,
            title: base.title.clone(),
            completed: base.completed,
            priority: fields::priority(window),
            due_date: fields::due_date(window),
            tags: fields::tags(window),
            recurrence_pattern: fields::recurrence(window),
        });
    }
    annotations
}
