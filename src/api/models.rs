// src/api/models.rs

use crate::error::{AppError, ConfigError, ErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// 操作成功的响应体
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// 替换列表条目的请求体
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateEntriesRequest {
    #[serde(default)]
    pub entries: Vec<String>,
}

/// 错误对应的 HTTP 状态码
pub fn status_code(err: &AppError) -> StatusCode {
    match err {
        // 已存储的文档读不出来是服务端问题
        AppError::Config(_) | AppError::Io(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => match err.kind() {
            ErrorKind::Parse | ErrorKind::Validation | ErrorKind::InvalidOperation => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Io | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            // 底层 I/O 错误可能带有文件路径，只返回错误类别
            AppError::Io(e) | AppError::Config(ConfigError::LoadError(e)) => {
                format!("IO error: {}", e.kind())
            }
            _ => self.to_string(),
        };
        (status_code(&self), message).into_response()
    }
}
