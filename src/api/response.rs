//! Status-code checks shared by every gateway call.

use reqwest::StatusCode;

use crate::error::TaskboardError;

/// Returns the response unchanged on 2xx.
///
/// - **401 / 403** → `UNAUTHORIZED`
/// - **any other non-success** → `API_ERROR` carrying status and body
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TaskboardError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(TaskboardError::unauthorized(status.as_u16()));
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(TaskboardError::api(status.as_u16(), &body));
    }
    Ok(resp)
}
