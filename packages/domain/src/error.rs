//! # ドメインエラー

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 期日を暦日として解釈できない
    #[error("期日を解釈できません: {0:?}")]
    InvalidDueDate(String),

    /// 値の検証に失敗
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
