use chrono::NaiveDate;

use todo_client::annotate::badges::{DueLabel, classify_due, has_notable_metadata};
use todo_client::annotate::{TaskAnnotation, parse_annotations};
use todo_client::models::task::{Priority, Recurrence};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("bad test date")
}

#[test]
fn test_plain_pending_task() {
    let parsed = parse_annotations("Task 30: Buy groceries (pending)");
    assert_eq!(
        parsed,
        vec![TaskAnnotation {
            id: 30,
            title: "Buy groceries".to_string(),
            completed: false,
            priority: None,
            due_date: None,
            tags: None,
            recurrence_pattern: None,
        }]
    );
}

#[test]
fn test_completed_task_with_all_fields() {
    let content =
        "Task 7: Finish report (completed) [priority:high] [due:2024-02-15] [tags:work,urgent]";
    let parsed = parse_annotations(content);
    assert_eq!(parsed.len(), 1);
    let annotation = &parsed[0];
    assert_eq!(annotation.id, 7);
    assert_eq!(annotation.title, "Finish report");
    assert!(annotation.completed);
    assert_eq!(annotation.priority, Some(Priority::High));
    assert_eq!(annotation.due_date.as_deref(), Some("2024-02-15"));
    assert_eq!(
        annotation.tags,
        Some(vec!["work".to_string(), "urgent".to_string()])
    );
    assert_eq!(annotation.recurrence_pattern, None);
}

#[test]
fn test_multiple_tasks_keep_textual_order() {
    let content = "Here is your list:\n\
                   Task 1: Water plants (pending) [recur:daily]\n\
                   Task 2: File taxes (completed)\n\
                   Task 3: Call the bank (pending) [priority:critical]";
    let parsed = parse_annotations(content);
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].id, 1);
    assert_eq!(parsed[0].recurrence_pattern, Some(Recurrence::Daily));
    assert_eq!(parsed[1].id, 2);
    assert!(parsed[1].completed);
    assert_eq!(parsed[2].id, 3);
    assert_eq!(parsed[2].priority, Some(Priority::Critical));
}

#[test]
fn test_prose_without_pattern_yields_nothing() {
    assert!(parse_annotations("I could not find any matching tasks.").is_empty());
    assert!(parse_annotations("").is_empty());
}

#[test]
fn test_status_word_is_case_insensitive() {
    let parsed = parse_annotations("TASK 4: Shout less (COMPLETED)");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].id, 4);
    assert!(parsed[0].completed);
}

#[test]
fn test_title_is_trimmed() {
    let parsed = parse_annotations("Task 9:    Mow the lawn    (pending)");
    assert_eq!(parsed[0].title, "Mow the lawn");
}

#[test]
fn test_fields_may_follow_on_the_next_line() {
    // Field text belongs to the preceding task until the next task line.
    let content = "Task 5: Renew passport (pending)\n\
                   due: 2024-06-01, priority: high\n\
                   Task 6: Pack bags (pending) [tags:travel]";
    let parsed = parse_annotations(content);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].due_date.as_deref(), Some("2024-06-01"));
    assert_eq!(parsed[0].priority, Some(Priority::High));
    assert_eq!(parsed[0].tags, None);
    assert_eq!(parsed[1].tags, Some(vec!["travel".to_string()]));
}

#[test]
fn test_unaccepted_field_values_are_dropped_silently() {
    let content = "Task 11: Defrag the garden (pending) [priority:mega] [due: whenever] [recur: hourly]";
    let parsed = parse_annotations(content);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].priority, None);
    assert_eq!(parsed[0].due_date, None);
    assert_eq!(parsed[0].recurrence_pattern, None);
}

#[test]
fn test_word_due_dates_pass_through_lowercased() {
    let parsed = parse_annotations("Task 12: Stretch (pending) [due: Tomorrow]");
    assert_eq!(parsed[0].due_date.as_deref(), Some("tomorrow"));
}

#[test]
fn test_notable_metadata_gate() {
    let mut annotation = parse_annotations("Task 1: Plain (pending)").remove(0);
    assert!(!has_notable_metadata(&annotation));

    // Medium is the default priority; alone it earns no badge.
    annotation.priority = Some(Priority::Medium);
    assert!(!has_notable_metadata(&annotation));

    annotation.priority = Some(Priority::Low);
    assert!(has_notable_metadata(&annotation));

    annotation.priority = None;
    annotation.due_date = Some("2024-02-15".to_string());
    assert!(has_notable_metadata(&annotation));

    annotation.due_date = None;
    annotation.tags = Some(vec!["home".to_string()]);
    assert!(has_notable_metadata(&annotation));

    annotation.tags = Some(Vec::new());
    assert!(!has_notable_metadata(&annotation));

    annotation.tags = None;
    annotation.recurrence_pattern = Some(Recurrence::Weekly);
    assert!(has_notable_metadata(&annotation));
}

#[test]
fn test_overdue_label_counts_calendar_days() {
    let today = date(2024, 2, 20);
    assert_eq!(
        classify_due("2024-02-15", false, today),
        DueLabel::Overdue(5)
    );
    assert_eq!(classify_due("2024-02-15", false, today).to_string(), "5d overdue");
    // A completed task is never overdue.
    assert_eq!(
        classify_due("2024-02-15", true, today).to_string(),
        "Feb 15"
    );
}

#[test]
fn test_due_labels_for_near_dates() {
    let today = date(2024, 2, 20);
    assert_eq!(classify_due("2024-02-20", false, today), DueLabel::Today);
    assert_eq!(classify_due("2024-02-21", false, today), DueLabel::Tomorrow);
    assert_eq!(classify_due("today", true, today), DueLabel::Today);
    assert_eq!(classify_due("junk", false, today), DueLabel::Raw("junk".to_string()));
}
