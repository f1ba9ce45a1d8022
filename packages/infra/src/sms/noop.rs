//! Noop SMS 送信実装

use async_trait::async_trait;
use pgmanager_domain::notification::{NotificationError, SmsMessage};

use super::SmsSender;

/// Noop SMS 送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopSmsSender;

#[async_trait]
impl SmsSender for NoopSmsSender {
    async fn send_sms(&self, sms: &SmsMessage) -> Result<String, NotificationError> {
        tracing::info!(
            to = %sms.to,
            length = sms.body.chars().count(),
            "Noop: SMS 送信をスキップ"
        );
        Ok("noop".to_string())
    }
}
