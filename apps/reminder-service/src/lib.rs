//! # PG Manager リマインダーサービス
//!
//! 家賃の支払い期日が近い、または過ぎた入居者に、メールと SMS でリマインダーを送る。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Scheduler   │────▶│ ReminderJob  │────▶│  Dispatcher  │────▶│  Channels   │
//! │ (cron, 毎日) │     │ (多重実行    │     │ (判定・集計) │     │ (Email/SMS) │
//! └──────────────┘     │   ガード)    │     └──────────────┘     └─────────────┘
//!                      └──────────────┘            ▲
//! ┌──────────────┐            ▲                    │
//! │   HTTP API   │────────────┴────────────────────┘
//! │ (/trigger,   │   /trigger はジョブ経由、/send と /send-single は直接
//! │  /send ...)  │
//! └──────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - HTTP エラーレスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`scheduler`] - cron スケジューラー
//! - [`usecase`] - リマインダーの送信と集計

pub mod config;
pub mod error;
pub mod handler;
pub mod scheduler;
pub mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handler::{
    NotificationState,
    get_config,
    get_status,
    health_check,
    send_reminders,
    send_single_reminder,
    trigger_reminder_job,
};

/// ルーターを構築する
///
/// 通知 API は `/api/notifications` 配下にまとめる。
pub fn router(state: Arc<NotificationState>) -> Router {
    let notifications = Router::new()
        .route("/test", get(get_status))
        .route("/config", get(get_config))
        .route("/trigger", post(trigger_reminder_job))
        .route("/send", post(send_reminders))
        .route("/send-single", post(send_single_reminder))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/notifications", notifications)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
