use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::api::{assigned, response::check_response, AssignOutcome, TaskApi};
use crate::error::{ErrorCode, TaskboardError};
use crate::models::{
    AssignRequest, AssignedTask, BearerToken, LoginRequest, LoginResponse, SignupRequest, Task,
    TaskDraft, TaskStatus,
};

pub const ASSIGNED_FETCH_FAILED: &str = "Failed to fetch assigned tasks";

/// HTTP client for the task backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, TaskboardError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TaskboardError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&BearerToken>) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match token {
            Some(t) => req.header(AUTHORIZATION, t.header_value()),
            None => req,
        }
    }

    async fn send(&self, op: &'static str, req: RequestBuilder) -> Result<reqwest::Response, TaskboardError> {
        tracing::debug!(op, "sending request");
        let resp = req.send().await.map_err(|e| {
            tracing::debug!(op, error = %e, "transport failure");
            TaskboardError::from(e)
        })?;
        tracing::debug!(op, status = resp.status().as_u16(), "response received");
        check_response(resp).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        op: &'static str,
        req: RequestBuilder,
    ) -> Result<T, TaskboardError> {
        let resp = self.send(op, req).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| TaskboardError::decode(format!("{op}: invalid response body: {e}")))
    }

    async fn fetch_assigned(&self, token: &BearerToken) -> Result<Vec<AssignedTask>, TaskboardError> {
        let req = self.request(Method::GET, "/tasks/assigned", Some(token));
        let payload: serde_json::Value = self.send_json("assigned_tasks", req).await?;
        assigned::normalize(payload)
    }
}

impl TaskApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<String, TaskboardError> {
        let req = self
            .request(Method::POST, "/auth/login", None)
            .json(&LoginRequest { email, password });
        let body: LoginResponse = self.send_json("login", req).await?;
        Ok(body.token)
    }

    async fn signup(&self, full_name: &str, email: &str, password: &str) -> Result<(), TaskboardError> {
        let req = self
            .request(Method::POST, "/auth/signup", None)
            .json(&SignupRequest { full_name, email, password });
        self.send("signup", req).await?;
        Ok(())
    }

    async fn create_task(&self, token: &BearerToken, draft: &TaskDraft) -> Result<Task, TaskboardError> {
        let req = self.request(Method::POST, "/tasks/create", Some(token)).json(draft);
        self.send_json("create_task", req).await
    }

    async fn my_tasks(&self, token: &BearerToken) -> Result<Vec<Task>, TaskboardError> {
        let req = self.request(Method::GET, "/tasks/mytasks", Some(token));
        self.send_json("my_tasks", req).await
    }

    async fn assigned_tasks(&self, token: &BearerToken) -> Result<Vec<AssignedTask>, TaskboardError> {
        self.fetch_assigned(token).await.map_err(|cause| {
            tracing::debug!(code = cause.code.as_str(), %cause, "assigned tasks fetch failed");
            TaskboardError::new(ErrorCode::LoadFailed, ASSIGNED_FETCH_FAILED)
        })
    }

    async fn update_task_status(
        &self,
        token: &BearerToken,
        id: i64,
        status: TaskStatus,
    ) -> Result<(), TaskboardError> {
        // JSON string body: `"In Progress"`, quotes included.
        let req = self
            .request(Method::PUT, &format!("/tasks/updateStatus/{id}"), Some(token))
            .json(&status);
        self.send("update_task_status", req).await?;
        Ok(())
    }

    async fn update_task(
        &self,
        token: &BearerToken,
        id: i64,
        draft: &TaskDraft,
    ) -> Result<Task, TaskboardError> {
        let req = self
            .request(Method::PUT, &format!("/tasks/update/{id}"), Some(token))
            .json(draft);
        self.send_json("update_task", req).await
    }

    async fn delete_task(&self, token: &BearerToken, id: i64) -> Result<(), TaskboardError> {
        let req = self.request(Method::DELETE, &format!("/tasks/delete/{id}"), Some(token));
        self.send("delete_task", req).await?;
        Ok(())
    }

    async fn assign_task(
        &self,
        token: &BearerToken,
        id: i64,
        email: &str,
    ) -> Result<AssignOutcome, TaskboardError> {
        let req = self
            .request(Method::POST, "/tasks/assign", Some(token))
            .json(&AssignRequest {
                task_id: id,
                assigned_to_emails: [email],
            });
        let resp = self.send("assign_task", req).await?;
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AssignOutcome::default());
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| TaskboardError::decode(format!("assign_task: invalid response body: {e}")))
    }
}
