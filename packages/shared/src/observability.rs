//! # ログ出力の初期化
//!
//! リマインダーサービスのログ出力を設定する。
//!
//! | `APP_ENV` | 既定の形式 | `RUST_LOG` 未設定時のフィルタ |
//! |-----------|------------|-------------------------------|
//! | `development` | Pretty | `info,pgmanager=debug` |
//! | それ以外 | JSON（1 行 1 イベント） | `info` |
//!
//! `LOG_FORMAT`（`json` / `pretty` / `compact`）で形式だけを上書きできる。
//! JSON 出力ではイベントのフィールドをトップレベルに展開するため、
//! 業務イベントは `jq 'select(.["event.kind"] == "business_event")'` で抽出できる。

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    /// 1 行に収めた人間向け出力（コンテナのログビューア向け）
    Compact,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する（大文字小文字は区別しない）
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// ログ出力の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// ルートスパン `app` の `service` フィールド
    pub service_name:      &'static str,
    pub format:            LogFormat,
    /// `RUST_LOG` が無いときに使うフィルタ
    pub default_directive: &'static str,
    /// 解釈できずに無視した `LOG_FORMAT` の値
    ///
    /// サブスクライバーの初期化前には出力先が無いため、初期化後に警告として出す。
    pub rejected_format:   Option<String>,
}

impl LoggingConfig {
    pub fn from_env(service_name: &'static str) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    pub fn from_lookup(service_name: &'static str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let development = lookup("APP_ENV").is_some_and(|env| env.trim() == "development");
        let default_format = if development { LogFormat::Pretty } else { LogFormat::Json };

        let (format, rejected_format) = match lookup("LOG_FORMAT") {
            Some(raw) if !raw.trim().is_empty() => match LogFormat::from_name(raw.trim()) {
                Some(format) => (format, None),
                None => (default_format, Some(raw)),
            },
            _ => (default_format, None),
        };

        Self {
            service_name,
            format,
            default_directive: if development { "info,pgmanager=debug" } else { "info" },
            rejected_format,
        }
    }
}

/// グローバルサブスクライバーを登録し、ルートスパン `app` に入る
///
/// 返り値のガードを保持している間、以降のログに `service` が付く。
/// `tracing_error::ErrorLayer` も登録するため、インフラ層のエラーは生成時点の SpanTrace を保持できる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &LoggingConfig) -> tracing::span::EnteredSpan {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_directive.into());

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    if let Some(raw) = &config.rejected_format {
        tracing::warn!(value = %raw, format = ?config.format, "LOG_FORMAT を解釈できないため既定の形式で出力します");
    }

    tracing::info_span!("app", service = config.service_name).entered()
}
