//! # HTTP リクエストハンドラ
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs              # 親モジュール（re-export）
//! └── handler/
//!     ├── health.rs       # ヘルスチェック
//!     └── notification.rs # /api/notifications 配下
//! ```
//!
//! ハンドラは薄く保ち、送信の判定と集計はユースケース層に委譲する。

pub mod health;
pub mod notification;

pub use health::health_check;
pub use notification::{
    NotificationState,
    get_config,
    get_status,
    send_reminders,
    send_single_reminder,
    trigger_reminder_job,
};
