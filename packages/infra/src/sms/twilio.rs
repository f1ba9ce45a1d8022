//! Twilio SMS 送信実装
//!
//! Twilio REST API の `POST /2010-04-01/Accounts/{AccountSid}/Messages.json` へ
//! `To` / `From` / `Body` をフォーム送信する。認証は Account SID と Auth Token の Basic 認証。

use async_trait::async_trait;
use pgmanager_domain::notification::{NotificationError, SmsMessage};
use serde::Deserialize;

use super::SmsSender;

const TWILIO_API_BASE_URL: &str = "https://api.twilio.com";

/// Twilio 認証情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid:  String,
    pub auth_token:   String,
    /// 送信元番号（国番号付き）
    pub phone_number: String,
}

/// 送信成功時のレスポンス（必要な項目のみ）
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// エラー時のレスポンス
#[derive(Debug, Deserialize)]
struct ErrorResource {
    code:    Option<u32>,
    message: String,
}

/// Twilio SMS 送信
#[derive(Clone)]
pub struct TwilioSmsSender {
    base_url:    String,
    client:      reqwest::Client,
    credentials: TwilioCredentials,
}

impl TwilioSmsSender {
    pub fn new(credentials: TwilioCredentials) -> Self {
        Self::with_base_url(TWILIO_API_BASE_URL, credentials)
    }

    /// API のベース URL を差し替えて作成する（スタブサーバー向け）
    pub fn with_base_url(base_url: &str, credentials: TwilioCredentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            credentials,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send_sms(&self, sms: &SmsMessage) -> Result<String, NotificationError> {
        let form = [
            ("To", sms.to.as_str()),
            ("From", self.credentials.phone_number.as_str()),
            ("Body", sms.body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Twilio 接続失敗: {e}")))?;

        handle_response(response).await
    }
}

/// Twilio のレスポンスから SID を取り出す
///
/// 2xx 以外はエラーレスポンスの `message` を原因として返す。
async fn handle_response(response: reqwest::Response) -> Result<String, NotificationError> {
    let status = response.status();

    if status.is_success() {
        let message = response
            .json::<MessageResource>()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Twilio レスポンス解析失敗: {e}")))?;
        return Ok(message.sid);
    }

    let body = response.text().await.unwrap_or_default();
    let reason = match serde_json::from_str::<ErrorResource>(&body) {
        Ok(ErrorResource {
            code: Some(code),
            message,
        }) => format!("{message} (code {code})"),
        Ok(ErrorResource { message, .. }) => message,
        Err(_) => body,
    };

    Err(NotificationError::SendFailed(format!(
        "Twilio 送信失敗 {status}: {reason}"
    )))
}
