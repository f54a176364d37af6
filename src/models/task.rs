use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Wire and display form, e.g. `In Progress`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Accepts the wire label (optionally wrapped in literal quotes) or a CLI slug.
    pub fn from_label(s: &str) -> Option<Self> {
        let cleaned = strip_quotes(s);
        match cleaned.trim() {
            "To Do" | "todo" | "to-do" => Some(Self::Todo),
            "In Progress" | "in-progress" | "in_progress" => Some(Self::InProgress),
            "Completed" | "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Style class of the status badge: first space to `-`, lowercased.
    pub fn badge_class(&self) -> String {
        self.as_str().replacen(' ', "-", 1).to_lowercase()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown task status: {raw}")))
    }
}

/// Removes every literal `"` from a status string.
///
/// The status-update call sends a JSON-encoded string body, so a backend that
/// stores the raw body hands the value back as `"In Progress"` with quotes.
pub fn strip_quotes(s: &str) -> String {
    s.replace('"', "")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedUser {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_to_users: Vec<AssignedUser>,
}

/// Body of create and full-update calls; also the shape of the create form
/// and of a pending edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(with = "due_date")]
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            due_date: task.due_date,
        }
    }

    /// Required-field check run before anything is sent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.due_date.is_none() {
            missing.push("dueDate");
        }
        missing
    }

    /// Sets one field from user text. Field names accept snake and camel case.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "title" => self.title = value.to_string(),
            "description" => self.description = value.to_string(),
            "status" => {
                self.status = TaskStatus::from_label(value)
                    .ok_or_else(|| format!("unknown status: {value}"))?;
            }
            "due" | "due_date" | "dueDate" => {
                self.due_date = Some(parse_due_date(value)?);
            }
            other => return Err(format!("unknown field: {other}")),
        }
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` date; a trailing time component is ignored.
pub fn parse_due_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| format!("invalid date: {s}"))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) mod due_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_due_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
