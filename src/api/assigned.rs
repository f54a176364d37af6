//! Translation of the "assigned to me" payload.
//!
//! The backend returns each assigned task as a positional row
//! `[title, description, _, _, dueDate, status]` instead of the named object
//! used for owned tasks. Rows are normalized here into [`AssignedTask`];
//! named objects are accepted too so a corrected backend keeps working.

use serde_json::Value;

use crate::error::TaskboardError;
use crate::models::{parse_due_date, AssignedTask, TaskStatus};

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const DUE_DATE: usize = 4;
const STATUS: usize = 5;

pub fn normalize(payload: Value) -> Result<Vec<AssignedTask>, TaskboardError> {
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(TaskboardError::decode(format!(
                "assigned tasks: expected a list, got {}",
                kind(&other)
            )))
        }
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Array(fields) => from_positional(fields),
            Value::Object(_) => from_named(row),
            other => Err(TaskboardError::decode(format!(
                "assigned task #{i}: expected a row or object, got {}",
                kind(other)
            ))),
        })
        .collect()
}

fn from_positional(fields: &[Value]) -> Result<AssignedTask, TaskboardError> {
    let title = text_at(fields, TITLE)
        .ok_or_else(|| TaskboardError::decode("assigned task row has no title"))?;
    let status_raw = text_at(fields, STATUS)
        .ok_or_else(|| TaskboardError::decode(format!("assigned task '{title}' has no status")))?;

    Ok(AssignedTask {
        description: text_at(fields, DESCRIPTION).unwrap_or_default(),
        status: parse_status(&status_raw)?,
        due_date: due_date(text_at(fields, DUE_DATE))?,
        title,
    })
}

fn from_named(obj: &Value) -> Result<AssignedTask, TaskboardError> {
    let field = |name: &str| obj.get(name).and_then(Value::as_str).map(str::to_string);
    let title = field("title").ok_or_else(|| TaskboardError::decode("assigned task has no title"))?;
    let status_raw = field("status")
        .ok_or_else(|| TaskboardError::decode(format!("assigned task '{title}' has no status")))?;

    Ok(AssignedTask {
        description: field("description").unwrap_or_default(),
        status: parse_status(&status_raw)?,
        due_date: due_date(field("dueDate"))?,
        title,
    })
}

fn text_at(fields: &[Value], idx: usize) -> Option<String> {
    fields.get(idx).and_then(Value::as_str).map(str::to_string)
}

fn parse_status(raw: &str) -> Result<TaskStatus, TaskboardError> {
    TaskStatus::from_label(raw)
        .ok_or_else(|| TaskboardError::decode(format!("unknown task status: {raw}")))
}

fn due_date(raw: Option<String>) -> Result<Option<chrono::NaiveDate>, TaskboardError> {
    match raw {
        Some(s) if !s.trim().is_empty() => parse_due_date(&s).map(Some).map_err(TaskboardError::decode),
        _ => Ok(None),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
