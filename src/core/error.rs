//! 核心错误处理模块

use axum::{
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use validator::ValidationErrors;

use crate::app::stars::repository::StoreError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    /// 存储层异常，`message` 面向调用方，`source` 附带原始错误
    #[error("{message}: {source}")]
    StoreFailure {
        message: &'static str,
        source: StoreError,
    },
}

impl CoreError {
    pub fn star_not_found() -> Self {
        CoreError::NotFound("Star not found".to_string())
    }

    pub fn store(message: &'static str, source: StoreError) -> Self {
        CoreError::StoreFailure { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) | CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for CoreError {
    fn from(rejection: FormRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

/// 错误响应结构
///
/// `error` 为字符串（错误类别或存储层原始错误）或对象（字段校验信息）。
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: Value,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, detail) = match self {
            CoreError::BadRequest(msg) => (msg, Value::from("BAD_REQUEST")),
            CoreError::Validation(errors) => {
                ("Invalid star payload".to_string(), validation_detail(&errors))
            }
            CoreError::NotFound(msg) => (msg, Value::from("NOT_FOUND")),
            CoreError::StoreFailure { message, source } => {
                error!("{}: {}", message, source);
                (message.to_string(), Value::from(source.to_string()))
            }
        };

        let error_response = ErrorResponse {
            message,
            error: detail,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

fn validation_detail(errors: &ValidationErrors) -> Value {
    let fields = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<Value> = errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| Value::from(msg.to_string()))
                        .unwrap_or_else(|| Value::from(error.code.to_string()))
                })
                .collect();
            (field.to_string(), Value::Array(messages))
        })
        .collect();

    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CoreError::star_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            CoreError::BadRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        let failure = CoreError::store(
            "Error deleting star",
            StoreError::Unavailable("connection reset".into()),
        );
        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(failure.to_string().contains("connection reset"));
    }
}
