use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("require task title")]
    RequireTitle,

    #[error("invalid date format: {0:?}, expected YYYYMMDD")]
    InvalidDateFormat(String),

    #[error("invalid task id: {0:?}")]
    InvalidId(String),

    #[error("not found task: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::RequireTitle | TaskError::InvalidDateFormat(_) => {
                AppError::Validation(err.to_string())
            }
            TaskError::InvalidId(_) => AppError::InvalidId(err.to_string()),
            TaskError::NotFound(_) => AppError::NotFound(err.to_string()),
            TaskError::Database(msg) => AppError::Database(sea_orm::DbErr::Custom(msg)),
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaskError::Database(err.to_string())
    }
}
