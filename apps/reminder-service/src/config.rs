//! # Reminder Service 設定
//!
//! 環境変数からリマインダーサービスの設定を読み込む。
//! 起動時に一度だけ読み込み、以降は不変の値として各コンポーネントに渡す。

use std::{env, time::Duration};

use chrono_tz::Tz;
use pgmanager_domain::reminder::{DEFAULT_DAYS_BEFORE_DUE, ReminderPolicy};
use pgmanager_infra::{
    notification::{SmtpSettings, well_known_smtp_host},
    sms::TwilioCredentials,
};
use thiserror::Error;

const DEFAULT_SCHEDULE: &str = "0 9 * * *";
const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// 設定の読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} の値が不正です: {value:?}（{reason}）")]
    InvalidValue {
        key:    &'static str,
        value:  String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reminder Service の設定
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// バインドアドレス
    pub host:          String,
    /// ポート番号
    pub port:          u16,
    /// `development` のとき起動直後にもリマインダージョブを実行する
    pub app_env:       String,
    /// 開発モードの起動時実行までの待ち時間
    pub startup_delay: Duration,
    pub reminder:      ReminderSettings,
    pub email:         EmailConfig,
    pub sms:           SmsConfig,
}

/// リマインダーの動作設定
///
/// ディスパッチャーとスケジューラーへ明示的に渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettings {
    pub email_enabled:   bool,
    pub sms_enabled:     bool,
    /// 期日の何日前から送信するか
    pub days_before_due: u32,
    /// cron 式（5 フィールド、または秒付きの 6/7 フィールド）
    pub schedule:        String,
    /// スケジュールと「今日」の判定に使うタイムゾーン
    pub timezone:        Tz,
    /// 1 チャネル 1 回の送信に許す時間
    pub send_timeout:    Duration,
}

impl ReminderSettings {
    pub fn policy(&self) -> ReminderPolicy {
        ReminderPolicy::new(self.days_before_due)
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            email_enabled:   false,
            sms_enabled:     false,
            days_before_due: DEFAULT_DAYS_BEFORE_DUE,
            schedule:        DEFAULT_SCHEDULE.to_string(),
            timezone:        DEFAULT_TIMEZONE,
            send_timeout:    Duration::from_secs(30),
        }
    }
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailBackend {
    Smtp,
    Ses,
    Noop,
}

/// メール送信の設定
///
/// `EMAIL_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: `SMTP_HOST`（未設定なら `EMAIL_SERVICE` のリレー）へ STARTTLS で接続。
///   どちらからも接続先が決まらなければメールは未設定扱いになる
/// - `ses`: Amazon SES v2 経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub backend:      EmailBackend,
    /// SMTP の接続先（未知の `EMAIL_SERVICE` で `SMTP_HOST` も無ければ `None`）
    pub smtp_host:    Option<String>,
    pub smtp_port:    u16,
    pub username:     Option<String>,
    pub password:     Option<String>,
    /// 送信元アドレス（未設定なら `EMAIL_USER`）
    pub from_address: Option<String>,
}

impl EmailConfig {
    /// 送信に必要な認証情報が揃っているか
    pub fn is_configured(&self) -> bool {
        match self.backend {
            EmailBackend::Smtp => {
                self.smtp_host.is_some() && self.username.is_some() && self.password.is_some()
            }
            EmailBackend::Ses => self.from_address.is_some(),
            EmailBackend::Noop => true,
        }
    }

    /// SMTP 接続設定（接続先か認証情報が無ければ `None`）
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let host = self.smtp_host.clone()?;
        let username = self.username.clone()?;
        let password = self.password.clone()?;
        Some(SmtpSettings {
            host,
            port: self.smtp_port,
            from_address: self.from_address.clone().unwrap_or_else(|| username.clone()),
            username,
            password,
        })
    }
}

/// SMS 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsBackend {
    Twilio,
    Noop,
}

/// SMS 送信の設定
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub backend:      SmsBackend,
    pub account_sid:  Option<String>,
    pub auth_token:   Option<String>,
    pub phone_number: Option<String>,
}

impl SmsConfig {
    pub fn is_configured(&self) -> bool {
        match self.backend {
            SmsBackend::Twilio => self.account_sid.is_some() && self.auth_token.is_some(),
            SmsBackend::Noop => true,
        }
    }

    /// Twilio 認証情報（Account SID と Auth Token が無ければ `None`）
    pub fn twilio_credentials(&self) -> Option<TwilioCredentials> {
        Some(TwilioCredentials {
            account_sid:  self.account_sid.clone()?,
            auth_token:   self.auth_token.clone()?,
            phone_number: self.phone_number.clone().unwrap_or_default(),
        })
    }
}

impl ServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    ///
    /// 空文字列・空白のみの値は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = parse_or(var("PORT"), "PORT", 3001)?;
        let startup_delay = parse_or(var("REMINDER_STARTUP_DELAY_SECS"), "REMINDER_STARTUP_DELAY_SECS", 5)?;
        let send_timeout = parse_or(var("REMINDER_SEND_TIMEOUT_SECS"), "REMINDER_SEND_TIMEOUT_SECS", 30)?;

        let days_before_due = match var("DAYS_BEFORE_DUE") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "DAYS_BEFORE_DUE が不正なため既定値を使用します");
                DEFAULT_DAYS_BEFORE_DUE
            }),
            None => DEFAULT_DAYS_BEFORE_DUE,
        };

        let timezone = match var("REMINDER_TIMEZONE") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| ConfigError::invalid("REMINDER_TIMEZONE", &raw, e.to_string()))?,
            None => DEFAULT_TIMEZONE,
        };

        let reminder = ReminderSettings {
            email_enabled: var("ENABLE_EMAIL_REMINDERS").as_deref() == Some("true"),
            sms_enabled: var("ENABLE_SMS_REMINDERS").as_deref() == Some("true"),
            days_before_due,
            schedule: var("REMINDER_SCHEDULE").unwrap_or_else(|| DEFAULT_SCHEDULE.to_string()),
            timezone,
            send_timeout: Duration::from_secs(send_timeout),
        };

        let email_backend = match var("EMAIL_BACKEND").as_deref() {
            None | Some("smtp") => EmailBackend::Smtp,
            Some("ses") => EmailBackend::Ses,
            Some("noop") => EmailBackend::Noop,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "EMAIL_BACKEND",
                    other,
                    "smtp / ses / noop のいずれかを指定してください",
                ));
            }
        };

        let smtp_host = var("SMTP_HOST").or_else(|| {
            let service = var("EMAIL_SERVICE").unwrap_or_else(|| "gmail".to_string());
            let host = well_known_smtp_host(&service);
            if host.is_none() && email_backend == EmailBackend::Smtp {
                tracing::error!(
                    email_service = %service,
                    "未知の EMAIL_SERVICE です。SMTP_HOST を指定するまでメール送信は無効になります"
                );
            }
            host.map(str::to_string)
        });

        let username = var("EMAIL_USER");
        let email = EmailConfig {
            backend: email_backend,
            smtp_host,
            smtp_port: parse_or(var("SMTP_PORT"), "SMTP_PORT", 587)?,
            from_address: var("EMAIL_FROM").or_else(|| username.clone()),
            username,
            password: var("EMAIL_PASSWORD"),
        };

        let sms_backend = match var("SMS_BACKEND").as_deref() {
            None | Some("twilio") => SmsBackend::Twilio,
            Some("noop") => SmsBackend::Noop,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "SMS_BACKEND",
                    other,
                    "twilio / noop のいずれかを指定してください",
                ));
            }
        };

        let sms = SmsConfig {
            backend:      sms_backend,
            account_sid:  var("TWILIO_ACCOUNT_SID"),
            auth_token:   var("TWILIO_AUTH_TOKEN"),
            phone_number: var("TWILIO_PHONE_NUMBER"),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            app_env: var("APP_ENV").unwrap_or_else(|| "production".to_string()),
            startup_delay: Duration::from_secs(startup_delay),
            reminder,
            email,
            sms,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, &raw, e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn 環境変数が無ければ既定値になる() {
        let config = load(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert!(!config.is_development());
        assert_eq!(config.startup_delay, Duration::from_secs(5));
        assert_eq!(config.reminder, ReminderSettings::default());
        assert_eq!(config.email.backend, EmailBackend::Smtp);
        assert_eq!(config.email.smtp_host.as_deref(), Some("smtp.gmail.com"));
        assert_eq!(config.email.smtp_port, 587);
        assert!(!config.email.is_configured());
        assert_eq!(config.sms.backend, SmsBackend::Twilio);
        assert!(!config.sms.is_configured());
    }

    #[test]
    fn 有効化フラグはtrueちょうどのときだけ有効() {
        let config = load(&[
            ("ENABLE_EMAIL_REMINDERS", "true"),
            ("ENABLE_SMS_REMINDERS", "TRUE"),
        ])
        .unwrap();

        assert!(config.reminder.email_enabled);
        assert!(!config.reminder.sms_enabled);
    }

    #[test]
    fn 不正なdays_before_dueは既定値に戻す() {
        assert_eq!(load(&[("DAYS_BEFORE_DUE", "abc")]).unwrap().reminder.days_before_due, 3);
        assert_eq!(load(&[("DAYS_BEFORE_DUE", "-1")]).unwrap().reminder.days_before_due, 3);
        assert_eq!(load(&[("DAYS_BEFORE_DUE", "5")]).unwrap().reminder.days_before_due, 5);
    }

    #[test]
    fn 不正なportはエラーになる() {
        let result = load(&[("PORT", "http")]);

        assert!(matches!(result, Err(ConfigError::InvalidValue { key: "PORT", .. })));
    }

    #[test]
    fn 不正なタイムゾーンはエラーになる() {
        let result = load(&[("REMINDER_TIMEZONE", "Mars/Olympus")]);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "REMINDER_TIMEZONE", .. })
        ));
    }

    #[test]
    fn タイムゾーンとスケジュールを上書きできる() {
        let config = load(&[
            ("REMINDER_TIMEZONE", "Asia/Tokyo"),
            ("REMINDER_SCHEDULE", "30 8 * * 1-5"),
        ])
        .unwrap();

        assert_eq!(config.reminder.timezone, chrono_tz::Asia::Tokyo);
        assert_eq!(config.reminder.schedule, "30 8 * * 1-5");
    }

    #[test]
    fn smtp認証情報が揃えば設定済みになり送信元は既定でユーザー名() {
        let config = load(&[
            ("EMAIL_USER", "pgmanager@gmail.com"),
            ("EMAIL_PASSWORD", "app-password"),
            ("EMAIL_SERVICE", "outlook"),
        ])
        .unwrap();

        assert!(config.email.is_configured());
        assert_eq!(
            config.email.smtp_settings(),
            Some(SmtpSettings {
                host:         "smtp-mail.outlook.com".to_string(),
                port:         587,
                username:     "pgmanager@gmail.com".to_string(),
                password:     "app-password".to_string(),
                from_address: "pgmanager@gmail.com".to_string(),
            })
        );
    }

    #[test]
    fn smtp_hostはemail_serviceより優先する() {
        let config = load(&[("SMTP_HOST", "mail.example.com"), ("EMAIL_SERVICE", "unknown")]).unwrap();

        assert_eq!(config.email.smtp_host.as_deref(), Some("mail.example.com"));
    }

    #[test]
    fn 未知のemail_serviceでも起動できメールは未設定になる() {
        let config = load(&[
            ("EMAIL_SERVICE", "zoho"),
            ("ENABLE_EMAIL_REMINDERS", "false"),
            ("ENABLE_SMS_REMINDERS", "true"),
        ])
        .unwrap();

        assert_eq!(config.email.smtp_host, None);
        assert!(!config.email.is_configured());
        assert!(config.reminder.sms_enabled);
    }

    #[test]
    fn 未知のemail_serviceは認証情報が揃っていても送信設定を作らない() {
        let config = load(&[
            ("EMAIL_SERVICE", "sendgrid"),
            ("EMAIL_USER", "pgmanager@example.com"),
            ("EMAIL_PASSWORD", "app-password"),
        ])
        .unwrap();

        assert!(!config.email.is_configured());
        assert_eq!(config.email.smtp_settings(), None);
    }

    #[test]
    fn 空文字の認証情報は未設定として扱う() {
        let config = load(&[("EMAIL_USER", "user@example.com"), ("EMAIL_PASSWORD", "  ")]).unwrap();

        assert!(!config.email.is_configured());
        assert_eq!(config.email.smtp_settings(), None);
    }

    #[test]
    fn twilioはsidとトークンが揃えば設定済み() {
        let config = load(&[
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "token"),
        ])
        .unwrap();

        assert!(config.sms.is_configured());
        assert_eq!(
            config.sms.twilio_credentials(),
            Some(TwilioCredentials {
                account_sid:  "AC123".to_string(),
                auth_token:   "token".to_string(),
                phone_number: String::new(),
            })
        );
    }

    #[test]
    fn noopバックエンドは常に設定済み() {
        let config = load(&[("EMAIL_BACKEND", "noop"), ("SMS_BACKEND", "noop")]).unwrap();

        assert!(config.email.is_configured());
        assert!(config.sms.is_configured());
    }

    #[test]
    fn 未知のバックエンドはエラーになる() {
        assert!(matches!(
            load(&[("EMAIL_BACKEND", "sendmail")]),
            Err(ConfigError::InvalidValue { key: "EMAIL_BACKEND", .. })
        ));
        assert!(matches!(
            load(&[("SMS_BACKEND", "msg91")]),
            Err(ConfigError::InvalidValue { key: "SMS_BACKEND", .. })
        ));
    }
}
