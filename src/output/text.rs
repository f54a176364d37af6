use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AssignedTask, Task, TaskDraft, TaskStatus};
use crate::views::TaskBoard;

/// Due date in the configured pattern; an unusable pattern falls back to ISO.
pub fn format_date(date: Option<NaiveDate>, pattern: &str) -> String {
    let Some(d) = date else {
        return "-".to_string();
    };
    let mut out = String::new();
    if write!(out, "{}", d.format(pattern)).is_err() {
        return d.format("%Y-%m-%d").to_string();
    }
    out
}

/// `In Progress (in-progress)`
pub fn badge(status: TaskStatus) -> String {
    format!("{} ({})", status.as_str(), status.badge_class())
}

pub fn task_card(t: &Task, date_format: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  #{} {}", t.id, t.title);
    if !t.description.is_empty() {
        let _ = writeln!(out, "     {}", t.description);
    }
    let _ = writeln!(
        out,
        "     {}  Due: {}",
        badge(t.status),
        format_date(t.due_date, date_format)
    );
    if t.assigned_to_users.is_empty() {
        let _ = writeln!(out, "     Assigned To: No users assigned");
    } else {
        let emails: Vec<&str> = t.assigned_to_users.iter().map(|u| u.email.as_str()).collect();
        let _ = writeln!(out, "     Assigned To: {}", emails.join(", "));
    }
    out
}

pub fn assigned_card(a: &AssignedTask, date_format: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", a.title);
    if !a.description.is_empty() {
        let _ = writeln!(out, "     {}", a.description);
    }
    let _ = writeln!(
        out,
        "     {}  Due: {}",
        badge(a.status),
        format_date(a.due_date, date_format)
    );
    out
}

pub fn draft(heading: &str, d: &TaskDraft, date_format: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {heading}");
    let _ = writeln!(out, "     title:       {}", d.title);
    let _ = writeln!(out, "     description: {}", d.description);
    let _ = writeln!(out, "     status:      {}", d.status);
    let _ = writeln!(out, "     due:         {}", format_date(d.due_date, date_format));
    out
}

pub fn task_list(tasks: &[Task], date_format: &str) -> String {
    if tasks.is_empty() {
        return "  No tasks yet\n".to_string();
    }
    tasks.iter().map(|t| task_card(t, date_format)).collect()
}

pub fn assigned_list(tasks: &[AssignedTask], date_format: &str) -> String {
    if tasks.is_empty() {
        return "  No tasks assigned to you yet\n".to_string();
    }
    tasks.iter().map(|a| assigned_card(a, date_format)).collect()
}

pub fn board(b: &TaskBoard, date_format: &str) -> String {
    let mut out = String::from("Main Board\n");
    for e in b.errors() {
        let _ = writeln!(out, "! {e}");
    }
    if b.show_form() {
        out.push_str(&draft("Add New Task", b.new_task(), date_format));
    }
    if let Some(editing) = b.editing() {
        out.push_str(&draft(
            &format!("Editing #{}", editing.task_id),
            &editing.draft,
            date_format,
        ));
    }
    out.push_str("\nMy Tasks\n");
    out.push_str(&task_list(b.tasks(), date_format));
    out.push_str("\nAssigned To Me\n");
    out.push_str(&assigned_list(b.assigned(), date_format));
    out
}
