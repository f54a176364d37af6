use serde_json::{json, Value};

use crate::app::Navigation;
use crate::error::TaskboardError;
use crate::models::{AssignedTask, Task};
use crate::views::TaskBoard;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskboardError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_json(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "status": t.status.as_str(),
        "badge": t.status.badge_class(),
        "dueDate": t.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        "assignedToUsers": t.assigned_to_users.iter().map(|u| json!({"email": u.email})).collect::<Vec<_>>()
    })
}

pub fn assigned_json(a: &AssignedTask) -> Value {
    json!({
        "title": a.title,
        "description": a.description,
        "status": a.status.as_str(),
        "badge": a.status.badge_class(),
        "dueDate": a.due_date.map(|d| d.format("%Y-%m-%d").to_string())
    })
}

pub fn board_json(b: &TaskBoard) -> Value {
    json!({
        "tasks": b.tasks().iter().map(task_json).collect::<Vec<_>>(),
        "assigned": b.assigned().iter().map(assigned_json).collect::<Vec<_>>(),
        "errors": b.errors()
    })
}

pub fn navigation_json(nav: &Navigation) -> Value {
    json!({
        "requested": nav.requested.path(),
        "route": nav.resolved.path(),
        "redirected": nav.redirected()
    })
}
