//! # Reminder Service エラー定義
//!
//! HTTP ハンドラで発生するエラーと、管理画面が期待するレスポンス形式への変換を定義する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pgmanager_shared::{
    ErrorResponse,
    event_log::error::{category, kind},
};
use thiserror::Error;

/// HTTP ハンドラで発生するエラー
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 必須フィールドの欠落など
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// リマインダージョブの多重実行
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// 予期しないエラー
    #[error("内部エラー: {message}: {source_message}")]
    Internal {
        message:        String,
        source_message: String,
    },
}

impl ServiceError {
    pub fn internal(message: impl Into<String>, source: impl ToString) -> Self {
        Self::Internal {
            message:        message.into(),
            source_message: source.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServiceError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(message))
            }
            ServiceError::Conflict(message) => {
                (StatusCode::CONFLICT, ErrorResponse::conflict(message))
            }
            ServiceError::Internal {
                message,
                source_message,
            } => {
                tracing::error!(
                    error.category = category::INFRASTRUCTURE,
                    error.kind = kind::INTERNAL,
                    "{message}: {source_message}"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(message, source_message),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
