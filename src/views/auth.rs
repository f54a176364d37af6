//! Login and signup forms.
//!
//! Backend failures collapse into one static message per form: a wrong
//! password and an unreachable server look the same to the user.

use crate::api::TaskApi;
use crate::app::Route;
use crate::error::{ErrorCode, TaskboardError};
use crate::session::Session;

pub const LOGIN_FAILED: &str = "Invalid credentials. Please try again.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct LoginView {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginView {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            error: None,
        }
    }

    /// On success the token is stored and the board route is returned.
    pub async fn submit<A: TaskApi>(&mut self, api: &A, session: &Session) -> Result<Route, TaskboardError> {
        require("email", &self.email)?;
        require_email(&self.email)?;
        require("password", &self.password)?;

        let result = api.login(self.email.trim(), &self.password).await.and_then(|token| {
            if token.trim().is_empty() {
                Err(TaskboardError::decode("login response carried an empty token"))
            } else {
                Ok(token)
            }
        });
        match result {
            Ok(token) => {
                session.establish(&token)?;
                self.error = None;
                tracing::info!(email = %self.email.trim(), "logged in");
                Ok(Route::Tasks)
            }
            Err(cause) => {
                tracing::debug!(code = cause.code.as_str(), %cause, "login failed");
                self.error = Some(LOGIN_FAILED.to_string());
                Err(TaskboardError::new(ErrorCode::LoginFailed, LOGIN_FAILED))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupView {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl SignupView {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            error: None,
        }
    }

    /// Success leads to the login view; the new account is not logged in.
    pub async fn submit<A: TaskApi>(&mut self, api: &A) -> Result<Route, TaskboardError> {
        require("full name", &self.full_name)?;
        require("email", &self.email)?;
        require_email(&self.email)?;
        require("password", &self.password)?;

        match api
            .signup(self.full_name.trim(), self.email.trim(), &self.password)
            .await
        {
            Ok(()) => {
                self.error = None;
                tracing::info!(email = %self.email.trim(), "account created");
                Ok(Route::Login)
            }
            Err(cause) => {
                tracing::debug!(code = cause.code.as_str(), %cause, "signup failed");
                self.error = Some(SIGNUP_FAILED.to_string());
                Err(TaskboardError::new(ErrorCode::SignupFailed, SIGNUP_FAILED))
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), TaskboardError> {
    if value.trim().is_empty() {
        return Err(TaskboardError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_email(value: &str) -> Result<(), TaskboardError> {
    let v = value.trim();
    match v.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(TaskboardError::validation(format!("'{v}' is not a valid email address"))),
    }
}
