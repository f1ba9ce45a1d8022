//! SMTP メール送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用し、STARTTLS で SMTP リレーへ送信する。
//! `SMTP_HOST` が未設定の場合は `EMAIL_SERVICE`（gmail / outlook / yahoo）から接続先を決める。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use pgmanager_domain::notification::{EmailMessage, NotificationError};

use super::EmailSender;

/// 主要なメールサービスの SMTP リレーホスト
pub fn well_known_smtp_host(service: &str) -> Option<&'static str> {
    match service.trim().to_ascii_lowercase().as_str() {
        "gmail" => Some("smtp.gmail.com"),
        "outlook" | "hotmail" => Some("smtp-mail.outlook.com"),
        "yahoo" => Some("smtp.mail.yahoo.com"),
        _ => None,
    }
}

/// SMTP 接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host:         String,
    pub port:         u16,
    pub username:     String,
    pub password:     String,
    pub from_address: String,
}

/// SMTP メール送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpEmailSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpEmailSender {
    /// STARTTLS 接続の送信インスタンスを作成する
    ///
    /// 接続はこの時点では行わない（初回送信時に確立する）。
    pub fn new(settings: SmtpSettings) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| NotificationError::SendFailed(format!("SMTP リレー設定失敗: {e}")))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self {
            transport,
            from_address: settings.from_address,
        })
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?)
            .subject(&email.subject)
            .message_id(None)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError> {
        let message = self.build_message(email)?;
        let message_id = message
            .headers()
            .get_raw("Message-ID")
            .unwrap_or_default()
            .to_string();

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(message_id)
    }
}
