use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotAuthenticated,
    Unauthorized,
    TaskNotFound,
    UnknownRoute,
    ValidationError,
    TransportError,
    ApiError,
    DecodeError,
    SessionError,
    ConfigError,
    LoginFailed,
    SignupFailed,
    LoadFailed,
    CreateFailed,
    StatusUpdateFailed,
    UpdateFailed,
    DeleteFailed,
    AssignFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::UnknownRoute => "UNKNOWN_ROUTE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::ApiError => "API_ERROR",
            Self::DecodeError => "DECODE_ERROR",
            Self::SessionError => "SESSION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::SignupFailed => "SIGNUP_FAILED",
            Self::LoadFailed => "LOAD_FAILED",
            Self::CreateFailed => "CREATE_FAILED",
            Self::StatusUpdateFailed => "STATUS_UPDATE_FAILED",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::AssignFailed => "ASSIGN_FAILED",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TaskboardError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskboardError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            ErrorCode::NotAuthenticated,
            "Not logged in. Run `taskboard login` first.",
        )
    }

    pub fn unauthorized(status: u16) -> Self {
        Self::new(
            ErrorCode::Unauthorized,
            format!("Backend rejected the session token (HTTP {status})"),
        )
    }

    pub fn task_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task not found: {id}"))
    }

    pub fn unknown_route(path: &str) -> Self {
        Self::new(ErrorCode::UnknownRoute, format!("Unknown route: {path}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransportError, message)
    }

    pub fn api(status: u16, body: &str) -> Self {
        let body = body.trim();
        if body.is_empty() {
            Self::new(ErrorCode::ApiError, format!("Backend returned HTTP {status}"))
        } else {
            Self::new(
                ErrorCode::ApiError,
                format!("Backend returned HTTP {status}: {body}"),
            )
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecodeError, message)
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SessionError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl From<reqwest::Error> for TaskboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::decode(e.to_string())
        } else {
            Self::transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TaskboardError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}

impl From<std::io::Error> for TaskboardError {
    fn from(e: std::io::Error) -> Self {
        Self::session(e.to_string())
    }
}

impl From<figment::Error> for TaskboardError {
    fn from(e: figment::Error) -> Self {
        Self::config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_includes_body_when_present() {
        let e = TaskboardError::api(500, " boom \n");
        assert_eq!(e.code, ErrorCode::ApiError);
        assert_eq!(e.message, "Backend returned HTTP 500: boom");
    }

    #[test]
    fn api_error_without_body() {
        let e = TaskboardError::api(404, "");
        assert_eq!(e.to_string(), "Backend returned HTTP 404");
    }

    #[test]
    fn codes_are_screaming_snake() {
        assert_eq!(ErrorCode::StatusUpdateFailed.as_str(), "STATUS_UPDATE_FAILED");
        assert_eq!(ErrorCode::NotAuthenticated.as_str(), "NOT_AUTHENTICATED");
    }
}
