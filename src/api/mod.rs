//! Backend gateway.
//!
//! [`TaskApi`] is the seam the views are written against; [`ApiClient`] is the
//! HTTP implementation. Tests substitute an in-memory fake.

pub mod assigned;
pub mod client;
pub mod response;

#[cfg(test)]
pub(crate) mod fake;

pub use client::ApiClient;

use serde::Deserialize;

use crate::error::TaskboardError;
use crate::models::{AssignedTask, BearerToken, Task, TaskDraft, TaskStatus};

/// Part of the assign response the client consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssignOutcome {
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

#[allow(async_fn_in_trait)]
pub trait TaskApi {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<String, TaskboardError>;

    async fn signup(&self, full_name: &str, email: &str, password: &str) -> Result<(), TaskboardError>;

    async fn create_task(&self, token: &BearerToken, draft: &TaskDraft) -> Result<Task, TaskboardError>;

    async fn my_tasks(&self, token: &BearerToken) -> Result<Vec<Task>, TaskboardError>;

    /// Fails with a fixed "Failed to fetch assigned tasks" message whatever the cause.
    async fn assigned_tasks(&self, token: &BearerToken) -> Result<Vec<AssignedTask>, TaskboardError>;

    async fn update_task_status(
        &self,
        token: &BearerToken,
        id: i64,
        status: TaskStatus,
    ) -> Result<(), TaskboardError>;

    async fn update_task(
        &self,
        token: &BearerToken,
        id: i64,
        draft: &TaskDraft,
    ) -> Result<Task, TaskboardError>;

    async fn delete_task(&self, token: &BearerToken, id: i64) -> Result<(), TaskboardError>;

    async fn assign_task(
        &self,
        token: &BearerToken,
        id: i64,
        email: &str,
    ) -> Result<AssignOutcome, TaskboardError>;
}
