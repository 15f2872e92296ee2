//! Terminal rendering of the derived view.

use std::io::{self, Write};

use dayplan_core::{AnnotatedTask, Priority, TaskId, ViewQuery};
use serde::Serialize;

/// JSON shape of one row of `dayplan list --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewRow<'a> {
    id: TaskId,
    text: &'a str,
    category: &'a str,
    due_date: Option<&'a str>,
    priority: Priority,
    completed: bool,
    countdown: String,
    overdue: bool,
}

impl<'a> From<&'a AnnotatedTask> for ViewRow<'a> {
    fn from(row: &'a AnnotatedTask) -> Self {
        Self {
            id: row.task.id,
            text: &row.task.text,
            category: &row.task.category,
            due_date: row.task.due_date.as_deref(),
            priority: row.task.priority,
            completed: row.task.completed,
            countdown: row.countdown_label(),
            overdue: row.is_overdue,
        }
    }
}

pub fn print_json(view: &[AnnotatedTask]) -> anyhow::Result<()> {
    let rows: Vec<ViewRow<'_>> = view.iter().map(ViewRow::from).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &rows)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_table(view: &[AnnotatedTask], query: &ViewQuery) {
    print!("{}", format_table(view, query));
}

/// Table with one line per task and a selection summary underneath.
pub fn format_table(view: &[AnnotatedTask], query: &ViewQuery) -> String {
    let mut out = String::new();
    if view.is_empty() {
        out.push_str("No tasks.\n");
    } else {
        out.push_str(&format!(
            "{:<5} {:<3} {:<32} {:<12} {:<11} {:<7} {}\n",
            "ID", "", "Task", "Category", "Due", "Pri", "Countdown"
        ));
        for row in view {
            out.push_str(&format_row(row));
            out.push('\n');
        }
    }

    let mut summary = format!("filter: {}  sort: {}", query.filter, query.sort);
    if !query.search.is_empty() {
        summary.push_str(&format!("  search: {:?}", query.search));
    }
    out.push_str(&summary);
    out.push('\n');
    out
}

fn format_row(row: &AnnotatedTask) -> String {
    let task = &row.task;
    let check = if task.completed { "[x]" } else { "[ ]" };
    let due = task.due_date.as_deref().unwrap_or("-");
    let mut countdown = row.countdown_label();
    if row.is_overdue {
        countdown.push_str(" !");
    }
    format!(
        "{:<5} {:<3} {:<32} {:<12} {:<11} {:<7} {}",
        task.id,
        check,
        truncate(&task.text, 32),
        truncate(&task.category, 12),
        truncate(due, 11),
        task.priority,
        countdown
    )
    .trim_end()
    .to_string()
}

/// Truncate a string to a maximum width, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dayplan_core::{FilterMode, SortMode, Task};

    fn annotated(id: i64, text: &str, due: Option<&str>, completed: bool) -> AnnotatedTask {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        AnnotatedTask::annotate(
            Task {
                id: TaskId::new(id),
                text: text.to_string(),
                category: "Errands".to_string(),
                due_date: due.map(str::to_string),
                priority: Priority::High,
                completed,
            },
            now,
        )
    }

    #[test]
    fn truncate_adds_ellipsis_only_when_needed() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a bit too long", 8), "a bit t…");
    }

    #[test]
    fn rows_show_status_countdown_and_overdue_marker() {
        let view = vec![
            annotated(1, "Buy milk", Some("2025-01-02"), false),
            annotated(2, "Pay rent", Some("2024-12-30"), false),
            annotated(3, "Done already", None, true),
        ];
        let table = format_table(&view, &ViewQuery::default());
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("[ ]") && lines[1].ends_with("Due Tomorrow"));
        assert!(lines[2].ends_with("Overdue by 2 days !"));
        assert!(lines[3].contains("[x]") && lines[3].contains(" - "));
        assert_eq!(lines[4], "filter: all  sort: none");
    }

    #[test]
    fn empty_view_and_search_summary() {
        let query = ViewQuery {
            search: "milk".to_string(),
            filter: FilterMode::Pending,
            sort: SortMode::DueDate,
        };
        let table = format_table(&[], &query);
        assert_eq!(
            table,
            "No tasks.\nfilter: pending  sort: due-date  search: \"milk\"\n"
        );
    }

    #[test]
    fn json_rows_carry_annotations() {
        let row = annotated(1, "Buy milk", Some("2025-01-02"), false);
        let value = serde_json::to_value(ViewRow::from(&row)).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["dueDate"], "2025-01-02");
        assert_eq!(value["priority"], "High");
        assert_eq!(value["countdown"], "Due Tomorrow");
        assert_eq!(value["overdue"], false);
    }
}
