//! # SMS 送信
//!
//! リマインダー SMS の送信を担当するインフラストラクチャモジュール。
//!
//! - **Twilio**: REST API（`Messages.json`）へフォーム POST する
//! - **Noop**: ログ出力のみ
//!
//! `SMS_BACKEND` でランタイム選択する。

mod noop;
mod twilio;

use async_trait::async_trait;
pub use noop::NoopSmsSender;
use pgmanager_domain::notification::{NotificationError, SmsMessage};
pub use twilio::{TwilioCredentials, TwilioSmsSender};

/// SMS 送信トレイト
///
/// 送信に成功したらプロバイダのメッセージ ID（Twilio の SID）を返す。
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, sms: &SmsMessage) -> Result<String, NotificationError>;
}
