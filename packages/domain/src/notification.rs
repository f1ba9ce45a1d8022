//! # 通知
//!
//! リマインダー 1 件分の通知ペイロードと、チャネル（メール・SMS）ごとの送信結果を定義する。
//!
//! ## 設計方針
//!
//! - **送信失敗は値で返す**: チャネルの送信失敗は [`DeliveryResult`] に畳み込み、
//!   ディスパッチャーへはエラーとして伝播させない
//! - **チャネル独立**: 一方のチャネルの失敗はもう一方の送信を妨げない

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::{
    payment::{Amount, DueDate, Payment},
    tenant::Tenant,
};

/// リマインダー通知ペイロード
///
/// 支払いと入居者から組み立てる。テンプレート描画の入力になる。
/// 期日と金額は検証済みの値を受け取る。
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderNotification {
    pub recipient_email: Option<String>,
    pub recipient_phone: Option<String>,
    pub tenant_name:     String,
    pub amount:          Amount,
    pub due_date:        DueDate,
    pub room_number:     String,
    pub is_overdue:      bool,
}

impl ReminderNotification {
    pub fn new(
        payment: &Payment,
        tenant: &Tenant,
        amount: Amount,
        due_date: DueDate,
        is_overdue: bool,
    ) -> Self {
        Self {
            recipient_email: tenant.email_address().map(str::to_string),
            recipient_phone: tenant.phone_number().map(str::to_string),
            tenant_name: tenant.name.clone(),
            amount,
            due_date,
            room_number: payment.room.clone(),
            is_overdue,
        }
    }
}

/// 送信するメール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to:        String,
    pub subject:   String,
    pub html_body: String,
    pub text_body: String,
}

/// 送信する SMS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub to:   String,
    pub body: String,
}

/// 通知チャネル
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ChannelKind {
    Email,
    Sms,
}

/// チャネル送信の結果区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryStatus {
    /// プロバイダが受け付けた
    Sent,
    /// 設定でチャネルが無効化されている
    Disabled,
    /// プロバイダの認証情報が無い
    NotConfigured,
    /// 宛先欠落・描画失敗・プロバイダエラー・タイムアウト
    Failed,
}

/// 通知送信エラー
///
/// チャネル内部で発生し、[`DeliveryResult::from_error`] で送信結果に変換される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("チャネルが無効化されています")]
    Disabled,

    #[error("プロバイダの認証情報が設定されていません")]
    NotConfigured,

    #[error("宛先がありません")]
    MissingRecipient,

    #[error("送信に失敗しました: {0}")]
    SendFailed(String),

    #[error("テンプレートのレンダリングに失敗しました: {0}")]
    TemplateFailed(String),

    #[error("送信が {0} 秒以内に完了しませんでした")]
    Timeout(u64),
}

/// チャネル 1 回分の送信結果
///
/// 管理画面へそのまま返す。成功時はプロバイダのメッセージ ID、失敗時は原因を載せる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success:    bool,
    pub status:     DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:      Option<String>,
    pub message:    String,
}

impl DeliveryResult {
    pub fn sent(channel: ChannelKind, message_id: impl Into<String>) -> Self {
        let message = match channel {
            ChannelKind::Email => "Email sent successfully",
            ChannelKind::Sms => "SMS sent successfully",
        };
        Self {
            success:    true,
            status:     DeliveryStatus::Sent,
            message_id: Some(message_id.into()),
            error:      None,
            message:    message.to_string(),
        }
    }

    pub fn from_error(channel: ChannelKind, err: &NotificationError) -> Self {
        let (status, message, error) = match (channel, err) {
            (ChannelKind::Email, NotificationError::Disabled) => {
                (DeliveryStatus::Disabled, "Email reminders disabled", None)
            }
            (ChannelKind::Sms, NotificationError::Disabled) => {
                (DeliveryStatus::Disabled, "SMS reminders disabled", None)
            }
            (ChannelKind::Email, NotificationError::NotConfigured) => (
                DeliveryStatus::NotConfigured,
                "Email credentials not configured",
                None,
            ),
            (ChannelKind::Sms, NotificationError::NotConfigured) => (
                DeliveryStatus::NotConfigured,
                "Twilio credentials not configured",
                None,
            ),
            (ChannelKind::Email, other) => (
                DeliveryStatus::Failed,
                "Failed to send email",
                Some(other.to_string()),
            ),
            (ChannelKind::Sms, other) => (
                DeliveryStatus::Failed,
                "Failed to send SMS",
                Some(other.to_string()),
            ),
        };

        Self {
            success: false,
            status,
            message_id: None,
            error,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        payment::{PaymentId, PaymentStatus},
        tenant::TenantId,
    };

    #[test]
    fn 支払いと入居者から通知ペイロードを組み立てる() {
        let payment = Payment {
            id:        PaymentId::new(1),
            tenant:    "Rahul Sharma".to_string(),
            tenant_id: Some(TenantId::new(1)),
            room:      "101".to_string(),
            amount:    dec!(8000),
            due_date:  "2025-03-12".to_string(),
            status:    PaymentStatus::Pending,
        };
        let tenant = Tenant::new(TenantId::new(1), "Rahul Sharma")
            .with_email("rahul.sharma@example.com")
            .with_phone("  ");
        let due_date = DueDate::new(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());

        let amount = payment.validated_amount().unwrap();

        let notification = ReminderNotification::new(&payment, &tenant, amount, due_date, false);

        assert_eq!(
            notification,
            ReminderNotification {
                recipient_email: Some("rahul.sharma@example.com".to_string()),
                recipient_phone: None,
                tenant_name:     "Rahul Sharma".to_string(),
                amount:          Amount::new(dec!(8000)).unwrap(),
                due_date,
                room_number:     "101".to_string(),
                is_overdue:      false,
            }
        );
    }

    #[test]
    fn 送信成功はメッセージidを含めてシリアライズする() {
        let result = DeliveryResult::sent(ChannelKind::Email, "<abc@smtp>");

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "success": true,
                "status": "sent",
                "messageId": "<abc@smtp>",
                "message": "Email sent successfully"
            })
        );
    }

    #[rstest]
    #[case(ChannelKind::Email, NotificationError::Disabled, DeliveryStatus::Disabled, "Email reminders disabled")]
    #[case(ChannelKind::Sms, NotificationError::Disabled, DeliveryStatus::Disabled, "SMS reminders disabled")]
    #[case(ChannelKind::Email, NotificationError::NotConfigured, DeliveryStatus::NotConfigured, "Email credentials not configured")]
    #[case(ChannelKind::Sms, NotificationError::NotConfigured, DeliveryStatus::NotConfigured, "Twilio credentials not configured")]
    fn 設定起因の失敗はerrorを持たない(
        #[case] channel: ChannelKind,
        #[case] err: NotificationError,
        #[case] expected_status: DeliveryStatus,
        #[case] expected_message: &str,
    ) {
        let result = DeliveryResult::from_error(channel, &err);

        assert!(!result.success);
        assert_eq!(result.status, expected_status);
        assert_eq!(result.message, expected_message);
        assert_eq!(result.error, None);
        assert_eq!(result.message_id, None);
    }

    #[rstest]
    #[case(ChannelKind::Email, "Failed to send email")]
    #[case(ChannelKind::Sms, "Failed to send SMS")]
    fn プロバイダエラーは原因をerrorに載せる(#[case] channel: ChannelKind, #[case] expected_message: &str) {
        let err = NotificationError::SendFailed("connection refused".to_string());

        let result = DeliveryResult::from_error(channel, &err);

        assert_eq!(result.status, DeliveryStatus::Failed);
        assert_eq!(result.message, expected_message);
        assert_eq!(
            result.error.as_deref(),
            Some("送信に失敗しました: connection refused")
        );
    }

    #[test]
    fn タイムアウトは失敗として扱う() {
        let result = DeliveryResult::from_error(ChannelKind::Sms, &NotificationError::Timeout(30));

        assert!(!result.success);
        assert_eq!(result.status, DeliveryStatus::Failed);
    }

    #[test]
    fn チャネル名はsnake_caseで表示する() {
        assert_eq!(ChannelKind::Email.to_string(), "email");
        assert_eq!(ChannelKind::Sms.to_string(), "sms");
    }
}
