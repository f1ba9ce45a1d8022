//! # メール送信
//!
//! リマインダーメールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `EmailSender` trait でメール送信を抽象化
//! - **3 つの実装**: SMTP（Gmail 等のリレー）、SES（本番用）、Noop（ローカル確認用）
//! - **環境変数切替**: `EMAIL_BACKEND` でランタイム選択

mod noop;
mod ses;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopEmailSender;
use pgmanager_domain::notification::{EmailMessage, NotificationError};
pub use ses::SesEmailSender;
pub use smtp::{SmtpEmailSender, SmtpSettings, well_known_smtp_host};

/// メール送信トレイト
///
/// 送信に成功したらプロバイダのメッセージ ID を返す。
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError>;
}
