use chrono::NaiveDate;
use serde::Serialize;

use super::TaskStatus;

/// A task another user delegated to the current user. Read-only.
///
/// The backend delivers these as positional rows; `api::assigned` turns them
/// into this shape so the rest of the client never sees the indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}
