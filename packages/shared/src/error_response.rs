//! # エラーレスポンス
//!
//! 通知 API で共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - 管理画面が期待する `{ "success": false, "message": ..., "error": ... }` 形式
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// `success` は常に `false`。`error` は内部エラー時のみ原因メッセージを載せる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }

    /// 400 Bad Request（必須フィールド欠落など）
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, None)
    }

    /// 409 Conflict（リマインダージョブ実行中など）
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message, None)
    }

    /// 500 Internal Server Error
    pub fn internal_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(message, Some(error.into()))
    }
}
