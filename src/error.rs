use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors answered by the JSON endpoint. Upstream failures are not among
/// them: they degrade to a day without meals.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid query: {}", .0.join("; "))]
    InvalidQuery(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error, details) = match self {
            AppError::InvalidQuery(problems) => {
                tracing::debug!(problems = problems.len(), "Rejected query");
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_query", problems)
            }
        };

        (
            status_code,
            Json(json!({
                "error": error,
                "details": details,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_query_is_unprocessable() {
        let err = AppError::InvalidQuery(vec!["bad date".to_string(), "bad fat".to_string()]);
        assert_eq!(err.to_string(), "Invalid query: bad date; bad fat");
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
