use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;

/// Every failure a handler can surface.
///
/// Validation and not-found errors are reported to the client verbatim;
/// storage and internal failures are logged and collapse to a static 500.
#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    Validation(#[error(not(source))] String),

    #[display(fmt = "{} {} not found", entity, id)]
    NotFound { entity: &'static str, id: u64 },

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "internal error: {}", _0)]
    Internal(#[error(not(source))] String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn worker_not_found(id: u64) -> Self {
        AppError::NotFound {
            entity: "Worker",
            id,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound { entity, .. } => format!("{entity} not found"),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal Server Error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "Internal Server Error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
