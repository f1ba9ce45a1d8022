//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! リマインダー送信の結果を `jq` で追跡できるよう、ログフィールドの命名規約と
//! ヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` / `tracing::warn!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID（支払い ID など）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const REMINDER: &str = "reminder";
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        // リマインダージョブ
        pub const REMINDER_JOB_STARTED: &str = "reminder_job.started";
        pub const REMINDER_JOB_COMPLETED: &str = "reminder_job.completed";
        pub const REMINDER_JOB_SKIPPED: &str = "reminder_job.skipped";

        // 支払い単位のリマインダー
        pub const REMINDER_SENT: &str = "reminder.sent";
        pub const REMINDER_FAILED: &str = "reminder.failed";
        pub const REMINDER_SKIPPED: &str = "reminder.skipped";

        // チャネル単位の送信
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const PAYMENT: &str = "payment";
        pub const REMINDER_JOB: &str = "reminder_job";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
        pub const SKIPPED: &str = "skipped";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 呼び出し元から渡されたデータの不備
        pub const INPUT: &str = "input";
        /// インフラストラクチャ（データソース）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（SMTP、SES、Twilio）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const INVALID_DUE_DATE: &str = "invalid_due_date";
        pub const INVALID_AMOUNT: &str = "invalid_amount";
        pub const DATA_SOURCE: &str = "data_source";
        pub const EMAIL_DELIVERY: &str = "email_delivery";
        pub const SMS_DELIVERY: &str = "sms_delivery";
        pub const INTERNAL: &str = "internal";
    }
}
