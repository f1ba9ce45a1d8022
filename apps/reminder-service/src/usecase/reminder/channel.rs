//! # 通知チャネル
//!
//! メール・SMS それぞれの送信を 1 回分の [`DeliveryResult`] にまとめる。
//!
//! 送信前に次の順で判定し、該当すればプロバイダに接続せずに失敗結果を返す:
//!
//! 1. 設定でチャネルが無効化されている（`Disabled`）
//! 2. プロバイダの認証情報が無い（`NotConfigured`）
//! 3. 宛先が無い（`MissingRecipient`）
//!
//! プロバイダのエラーとタイムアウトも失敗結果に変換し、呼び出し元へは伝播させない。

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Datelike;
use chrono_tz::Tz;
use pgmanager_domain::{
    clock::Clock,
    notification::{ChannelKind, DeliveryResult, NotificationError, ReminderNotification},
};
use pgmanager_infra::{EmailSender, SmsSender};
use pgmanager_shared::{
    event_log::{
        error::{category, kind},
        event,
    },
    log_business_event,
};

use super::TemplateRenderer;

/// 通知チャネル
#[async_trait]
pub trait ReminderChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// 通知を 1 回送信する（失敗も結果として返す）
    async fn send(&self, notification: &ReminderNotification) -> DeliveryResult;
}

/// メールチャネル
pub struct EmailChannel {
    enabled:  bool,
    sender:   Option<Arc<dyn EmailSender>>,
    renderer: Arc<TemplateRenderer>,
    clock:    Arc<dyn Clock>,
    timezone: Tz,
    timeout:  Duration,
}

impl EmailChannel {
    /// `sender` が `None` のときは認証情報が無いものとして扱う
    pub fn new(
        enabled: bool,
        sender: Option<Arc<dyn EmailSender>>,
        renderer: Arc<TemplateRenderer>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        timeout: Duration,
    ) -> Self {
        Self {
            enabled,
            sender,
            renderer,
            clock,
            timezone,
            timeout,
        }
    }

    async fn try_send(&self, notification: &ReminderNotification) -> Result<String, NotificationError> {
        if !self.enabled {
            return Err(NotificationError::Disabled);
        }
        let sender = self.sender.as_ref().ok_or(NotificationError::NotConfigured)?;

        let year = self.clock.now().with_timezone(&self.timezone).year();
        let email = self.renderer.render_email(notification, year)?;

        with_timeout(self.timeout, sender.send_email(&email)).await
    }
}

#[async_trait]
impl ReminderChannel for EmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    async fn send(&self, notification: &ReminderNotification) -> DeliveryResult {
        let result = self.try_send(notification).await;
        to_delivery_result(ChannelKind::Email, notification, result)
    }
}

/// SMS チャネル
pub struct SmsChannel {
    enabled:  bool,
    sender:   Option<Arc<dyn SmsSender>>,
    renderer: Arc<TemplateRenderer>,
    timeout:  Duration,
}

impl SmsChannel {
    pub fn new(
        enabled: bool,
        sender: Option<Arc<dyn SmsSender>>,
        renderer: Arc<TemplateRenderer>,
        timeout: Duration,
    ) -> Self {
        Self {
            enabled,
            sender,
            renderer,
            timeout,
        }
    }

    async fn try_send(&self, notification: &ReminderNotification) -> Result<String, NotificationError> {
        if !self.enabled {
            return Err(NotificationError::Disabled);
        }
        let sender = self.sender.as_ref().ok_or(NotificationError::NotConfigured)?;

        let sms = self.renderer.render_sms(notification)?;

        with_timeout(self.timeout, sender.send_sms(&sms)).await
    }
}

#[async_trait]
impl ReminderChannel for SmsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    async fn send(&self, notification: &ReminderNotification) -> DeliveryResult {
        let result = self.try_send(notification).await;
        to_delivery_result(ChannelKind::Sms, notification, result)
    }
}

async fn with_timeout(
    timeout: Duration,
    send: impl Future<Output = Result<String, NotificationError>>,
) -> Result<String, NotificationError> {
    tokio::time::timeout(timeout, send)
        .await
        .map_err(|_| NotificationError::Timeout(timeout.as_secs()))?
}

/// 送信結果をログに残し、[`DeliveryResult`] に変換する
fn to_delivery_result(
    channel: ChannelKind,
    notification: &ReminderNotification,
    result: Result<String, NotificationError>,
) -> DeliveryResult {
    let channel_name: &'static str = channel.into();

    match result {
        Ok(message_id) => {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SENT,
                event.result = event::result::SUCCESS,
                channel = channel_name,
                message_id = %message_id,
                tenant = %notification.tenant_name,
                "{channel_name} を送信しました"
            );
            DeliveryResult::sent(channel, message_id)
        }
        Err(err @ (NotificationError::Disabled | NotificationError::NotConfigured)) => {
            tracing::debug!(channel = channel_name, reason = %err, "{channel_name} の送信を省略しました");
            DeliveryResult::from_error(channel, &err)
        }
        Err(err) => {
            let error_kind = match channel {
                ChannelKind::Email => kind::EMAIL_DELIVERY,
                ChannelKind::Sms => kind::SMS_DELIVERY,
            };
            tracing::error!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_FAILED,
                event.result = event::result::FAILURE,
                error.category = category::EXTERNAL_SERVICE,
                error.kind = error_kind,
                channel = channel_name,
                tenant = %notification.tenant_name,
                "{channel_name} の送信に失敗しました: {err}"
            );
            DeliveryResult::from_error(channel, &err)
        }
    }
}
