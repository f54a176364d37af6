//! Task board: owned tasks, tasks assigned to the user, and every action on them.
//!
//! Local state changes only after the backend confirms an action. Each mount
//! starts a new generation; a load response issued under an older generation
//! is dropped instead of applied. Actions hold the board for their whole round
//! trip, so no remount can happen while one is in flight.

use std::collections::HashMap;

use crate::api::TaskApi;
use crate::app::Route;
use crate::error::{ErrorCode, TaskboardError};
use crate::models::{AssignedTask, AssignedUser, Task, TaskDraft, TaskStatus};
use crate::session::Session;
use crate::views::auth::require_email;

pub const LOAD_TASKS_FAILED: &str = "ไม่สามารถดึงข้อมูลงานได้";
pub const LOAD_ASSIGNED_FAILED: &str = "ไม่สามารถดึงงานที่ได้รับมอบหมาย";
pub const CREATE_FAILED: &str = "ไม่สามารถสร้างงานได้";
pub const STATUS_FAILED: &str = "ไม่สามารถอัปเดตสถานะได้";
pub const UPDATE_FAILED: &str = "ไม่สามารถแก้ไขงานได้";
pub const DELETE_FAILED: &str = "ไม่สามารถลบงานได้";
pub const ASSIGN_FAILED: &str = "ไม่สามารถมอบหมายงานได้";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unmounted,
    Loading,
    Ready,
}

/// Mount generation a request was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editing {
    pub task_id: i64,
    pub draft: TaskDraft,
}

#[derive(Debug, Default)]
pub struct TaskBoard {
    phase: Phase,
    generation: u64,
    pending_loads: u8,
    tasks: Vec<Task>,
    assigned: Vec<AssignedTask>,
    tasks_error: Option<String>,
    assigned_error: Option<String>,
    action_error: Option<String>,
    new_task: TaskDraft,
    show_form: bool,
    assign_emails: HashMap<i64, String>,
    editing: Option<Editing>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn assigned(&self) -> &[AssignedTask] {
        &self.assigned
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn editing(&self) -> Option<&Editing> {
        self.editing.as_ref()
    }

    pub fn new_task(&self) -> &TaskDraft {
        &self.new_task
    }

    pub fn new_task_mut(&mut self) -> &mut TaskDraft {
        &mut self.new_task
    }

    pub fn show_form(&self) -> bool {
        self.show_form
    }

    pub fn assign_email(&self, id: i64) -> &str {
        self.assign_emails.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Inline banners, load errors first.
    pub fn errors(&self) -> Vec<&str> {
        [&self.tasks_error, &self.assigned_error, &self.action_error]
            .into_iter()
            .filter_map(|e| e.as_deref())
            .collect()
    }

    pub fn dismiss_errors(&mut self) {
        self.tasks_error = None;
        self.assigned_error = None;
        self.action_error = None;
    }

    /// Starts a visit: fresh lists, `Loading`, new generation.
    pub fn mount(&mut self) -> Generation {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.pending_loads = 2;
        self.tasks.clear();
        self.assigned.clear();
        self.editing = None;
        self.assign_emails.clear();
        self.dismiss_errors();
        Generation(self.generation)
    }

    /// Leaves the view; anything still in flight becomes stale.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.phase = Phase::Unmounted;
        self.pending_loads = 0;
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    fn is_stale(&self, issued: Generation, op: &'static str) -> bool {
        let stale = issued.0 != self.generation;
        if stale {
            tracing::debug!(op, issued = issued.0, current = self.generation, "dropping stale response");
        }
        stale
    }

    fn load_settled(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        if self.pending_loads == 0 {
            self.phase = Phase::Ready;
        }
    }

    /// Returns `false` when the response was stale and ignored.
    pub fn apply_my_tasks(&mut self, issued: Generation, result: Result<Vec<Task>, TaskboardError>) -> bool {
        if self.is_stale(issued, "my_tasks") {
            return false;
        }
        match result {
            Ok(tasks) => self.tasks = tasks,
            Err(cause) => {
                tracing::info!(code = cause.code.as_str(), %cause, "loading owned tasks failed");
                self.tasks.clear();
                self.tasks_error = Some(LOAD_TASKS_FAILED.to_string());
            }
        }
        self.load_settled();
        true
    }

    pub fn apply_assigned(
        &mut self,
        issued: Generation,
        result: Result<Vec<AssignedTask>, TaskboardError>,
    ) -> bool {
        if self.is_stale(issued, "assigned_tasks") {
            return false;
        }
        match result {
            Ok(assigned) => self.assigned = assigned,
            Err(cause) => {
                tracing::info!(%cause, "loading assigned tasks failed");
                self.assigned.clear();
                self.assigned_error = Some(LOAD_ASSIGNED_FAILED.to_string());
            }
        }
        self.load_settled();
        true
    }

    /// Mounts and issues both fetches concurrently, once. No retry.
    pub async fn load<A: TaskApi>(&mut self, api: &A, session: &Session) {
        let issued = self.mount();
        let Some(token) = session.token() else {
            self.pending_loads = 0;
            self.phase = Phase::Ready;
            return;
        };
        let (mine, assigned) = tokio::join!(api.my_tasks(&token), api.assigned_tasks(&token));
        self.apply_my_tasks(issued, mine);
        self.apply_assigned(issued, assigned);
        tracing::debug!(
            owned = self.tasks.len(),
            assigned = self.assigned.len(),
            "board loaded"
        );
    }

    /// Mounts and fetches only the owned list. The assigned section stays empty.
    pub async fn load_owned<A: TaskApi>(&mut self, api: &A, session: &Session) {
        let issued = self.mount();
        self.pending_loads = 1;
        let Some(token) = session.token() else {
            self.pending_loads = 0;
            self.phase = Phase::Ready;
            return;
        };
        let mine = api.my_tasks(&token).await;
        self.apply_my_tasks(issued, mine);
    }

    pub fn toggle_form(&mut self) -> bool {
        self.show_form = !self.show_form;
        self.show_form
    }

    pub async fn create_task<A: TaskApi>(&mut self, api: &A, session: &Session) -> Result<(), TaskboardError> {
        let missing = self.new_task.missing_fields();
        if !missing.is_empty() {
            return Err(TaskboardError::validation(format!(
                "required: {}",
                missing.join(", ")
            )));
        }
        let token = session.require_token()?;

        match api.create_task(&token, &self.new_task).await {
            Ok(created) => {
                if self.task(created.id).is_some() {
                    tracing::warn!(id = created.id, "backend returned an id already on the board");
                }
                tracing::info!(id = created.id, title = %created.title, "task created");
                self.tasks.push(created);
                self.new_task = TaskDraft::default();
                self.show_form = false;
                Ok(())
            }
            Err(cause) => Err(self.fail(ErrorCode::CreateFailed, CREATE_FAILED, cause)),
        }
    }

    /// Sets only the local status, and only after the backend accepts it.
    pub async fn update_status<A: TaskApi>(
        &mut self,
        api: &A,
        session: &Session,
        id: i64,
        status: TaskStatus,
    ) -> Result<(), TaskboardError> {
        let token = session.require_token()?;

        match api.update_task_status(&token, id, status).await {
            Ok(()) => {
                if let Some(t) = self.tasks.iter_mut().find(|t| t.id == id) {
                    t.status = status;
                }
                tracing::info!(id, status = %status, "status updated");
                Ok(())
            }
            Err(cause) => Err(self.fail(ErrorCode::StatusUpdateFailed, STATUS_FAILED, cause)),
        }
    }

    /// Opens the edit draft for `id`. Any other open draft is discarded.
    pub fn begin_edit(&mut self, id: i64) -> Result<(), TaskboardError> {
        let task = self.task(id).ok_or_else(|| TaskboardError::task_not_found(id))?;
        let draft = TaskDraft::from_task(task);
        if let Some(prev) = self.editing.replace(Editing { task_id: id, draft }) {
            if prev.task_id != id {
                tracing::debug!(discarded = prev.task_id, "switching edit discards the open draft");
            }
        }
        Ok(())
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.editing.as_mut().map(|e| &mut e.draft)
    }

    /// Drops the draft. Nothing is sent.
    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    pub async fn save_edit<A: TaskApi>(&mut self, api: &A, session: &Session) -> Result<(), TaskboardError> {
        let Some(editing) = self.editing.clone() else {
            return Err(TaskboardError::validation("no task is being edited"));
        };
        let missing = editing.draft.missing_fields();
        if !missing.is_empty() {
            return Err(TaskboardError::validation(format!(
                "required: {}",
                missing.join(", ")
            )));
        }
        let token = session.require_token()?;

        match api.update_task(&token, editing.task_id, &editing.draft).await {
            Ok(mut updated) => {
                updated.id = editing.task_id;
                if let Some(t) = self.tasks.iter_mut().find(|t| t.id == editing.task_id) {
                    *t = updated;
                }
                self.editing = None;
                tracing::info!(id = editing.task_id, "task updated");
                Ok(())
            }
            Err(cause) => Err(self.fail(ErrorCode::UpdateFailed, UPDATE_FAILED, cause)),
        }
    }

    pub async fn delete_task<A: TaskApi>(&mut self, api: &A, session: &Session, id: i64) -> Result<(), TaskboardError> {
        let token = session.require_token()?;

        match api.delete_task(&token, id).await {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                if self.editing.as_ref().is_some_and(|e| e.task_id == id) {
                    self.editing = None;
                }
                self.assign_emails.remove(&id);
                tracing::info!(id, "task deleted");
                Ok(())
            }
            Err(cause) => Err(self.fail(ErrorCode::DeleteFailed, DELETE_FAILED, cause)),
        }
    }

    pub fn set_assign_email(&mut self, id: i64, email: impl Into<String>) {
        self.assign_emails.insert(id, email.into());
    }

    /// Assigns the email typed for `id`.
    ///
    /// On success the typed email is appended locally (duplicates included)
    /// and the backend's status adopted; the input is cleared. On failure the
    /// input is kept.
    pub async fn assign<A: TaskApi>(&mut self, api: &A, session: &Session, id: i64) -> Result<(), TaskboardError> {
        let email = self.assign_email(id).trim().to_string();
        require_email(&email)?;
        let token = session.require_token()?;

        match api.assign_task(&token, id, &email).await {
            Ok(outcome) => {
                if let Some(t) = self.tasks.iter_mut().find(|t| t.id == id) {
                    t.assigned_to_users.push(AssignedUser { email: email.clone() });
                    if let Some(status) = outcome.status {
                        t.status = status;
                    }
                }
                self.assign_emails.insert(id, String::new());
                tracing::info!(id, email = %email, "task assigned");
                Ok(())
            }
            Err(cause) => Err(self.fail(ErrorCode::AssignFailed, ASSIGN_FAILED, cause)),
        }
    }

    /// Clears the session and leaves the board. The token is not revoked server-side.
    pub fn logout(&mut self, session: &Session) -> Result<Route, TaskboardError> {
        session.teardown()?;
        self.unmount();
        self.tasks.clear();
        self.assigned.clear();
        self.editing = None;
        tracing::info!("logged out");
        Ok(Route::Login)
    }

    fn fail(
        &mut self,
        code: ErrorCode,
        message: &'static str,
        cause: TaskboardError,
    ) -> TaskboardError {
        tracing::info!(action = code.as_str(), cause_code = cause.code.as_str(), %cause, "action failed");
        self.action_error = Some(message.to_string());
        TaskboardError::new(code, message)
    }
}
