//! In-memory [`TaskApi`] used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::api::{AssignOutcome, TaskApi};
use crate::error::TaskboardError;
use crate::models::{AssignedTask, AssignedUser, BearerToken, Task, TaskDraft, TaskStatus};

pub const GOOD_EMAIL: &str = "ann@example.com";
pub const GOOD_PASSWORD: &str = "pw";
pub const TOKEN: &str = "tok-ann";

#[derive(Default)]
pub struct FakeApi {
    pub tasks: RefCell<Vec<Task>>,
    pub assigned: RefCell<Vec<AssignedTask>>,
    pub calls: RefCell<Vec<String>>,
    failing: RefCell<HashSet<&'static str>>,
    next_id: Cell<i64>,
    /// Token handed out on a good login instead of [`TOKEN`].
    pub login_token: RefCell<Option<String>>,
    /// Status the backend reports back from an assign call.
    pub assign_status: Cell<Option<TaskStatus>>,
}

impl FakeApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let api = Self::default();
        *api.tasks.borrow_mut() = tasks;
        api.next_id.set(next);
        api
    }

    pub fn fail_on(&self, op: &'static str) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, op: &'static str, token: Option<&BearerToken>) -> Result<(), TaskboardError> {
        self.calls.borrow_mut().push(op.to_string());
        if let Some(t) = token {
            if t.as_str() != TOKEN {
                return Err(TaskboardError::unauthorized(401));
            }
        }
        if self.failing.borrow().contains(op) {
            return Err(TaskboardError::api(500, "boom"));
        }
        Ok(())
    }

    fn mint_id(&self) -> i64 {
        let id = self.next_id.get().max(1);
        self.next_id.set(id + 1);
        id
    }
}

pub fn task(id: i64, title: &str, status: TaskStatus) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        status,
        due_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        assigned_to_users: Vec::new(),
    }
}

impl TaskApi for FakeApi {
    async fn login(&self, email: &str, password: &str) -> Result<String, TaskboardError> {
        self.record("login", None)?;
        if email == GOOD_EMAIL && password == GOOD_PASSWORD {
            Ok(self.login_token.borrow().clone().unwrap_or_else(|| TOKEN.to_string()))
        } else {
            Err(TaskboardError::unauthorized(401))
        }
    }

    async fn signup(&self, _full_name: &str, email: &str, _password: &str) -> Result<(), TaskboardError> {
        self.record("signup", None)?;
        if email == GOOD_EMAIL {
            return Err(TaskboardError::api(409, "exists"));
        }
        Ok(())
    }

    async fn create_task(&self, token: &BearerToken, draft: &TaskDraft) -> Result<Task, TaskboardError> {
        self.record("create_task", Some(token))?;
        let created = Task {
            id: self.mint_id(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            due_date: draft.due_date,
            assigned_to_users: Vec::new(),
        };
        self.tasks.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn my_tasks(&self, token: &BearerToken) -> Result<Vec<Task>, TaskboardError> {
        self.record("my_tasks", Some(token))?;
        Ok(self.tasks.borrow().clone())
    }

    async fn assigned_tasks(&self, token: &BearerToken) -> Result<Vec<AssignedTask>, TaskboardError> {
        self.record("assigned_tasks", Some(token))?;
        Ok(self.assigned.borrow().clone())
    }

    async fn update_task_status(
        &self,
        token: &BearerToken,
        id: i64,
        status: TaskStatus,
    ) -> Result<(), TaskboardError> {
        self.record("update_task_status", Some(token))?;
        let mut tasks = self.tasks.borrow_mut();
        let t = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskboardError::api(404, ""))?;
        t.status = status;
        Ok(())
    }

    async fn update_task(
        &self,
        token: &BearerToken,
        id: i64,
        draft: &TaskDraft,
    ) -> Result<Task, TaskboardError> {
        self.record("update_task", Some(token))?;
        let mut tasks = self.tasks.borrow_mut();
        let t = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskboardError::api(404, ""))?;
        t.title = draft.title.clone();
        t.description = draft.description.clone();
        t.status = draft.status;
        t.due_date = draft.due_date;
        Ok(t.clone())
    }

    async fn delete_task(&self, token: &BearerToken, id: i64) -> Result<(), TaskboardError> {
        self.record("delete_task", Some(token))?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(TaskboardError::api(404, ""));
        }
        Ok(())
    }

    async fn assign_task(
        &self,
        token: &BearerToken,
        id: i64,
        email: &str,
    ) -> Result<AssignOutcome, TaskboardError> {
        self.record("assign_task", Some(token))?;
        let mut tasks = self.tasks.borrow_mut();
        let t = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskboardError::api(404, ""))?;
        t.assigned_to_users.push(AssignedUser { email: email.to_string() });
        if let Some(s) = self.assign_status.get() {
            t.status = s;
        }
        Ok(AssignOutcome { status: Some(t.status) })
    }
}
