//! # 通知 API ハンドラ
//!
//! 管理画面から呼ばれる `/api/notifications` 配下のエンドポイント。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 内容 |
//! |----------|------|------|
//! | GET | `/test` | 稼働確認とチャネルの有効状態 |
//! | GET | `/config` | 現在の設定 |
//! | POST | `/trigger` | リマインダージョブを今すぐ実行 |
//! | POST | `/send` | 渡された支払い・入居者の一覧に送信 |
//! | POST | `/send-single` | 支払い 1 件に判定なしで送信 |
//!
//! `/trigger` だけが多重実行ガードの対象。実行中なら 409 を返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use pgmanager_domain::{payment::Payment, tenant::Tenant};
use serde::{Deserialize, Serialize};

use crate::{
    config::ReminderSettings,
    error::ServiceError,
    usecase::{
        ReminderDispatcher,
        ReminderJob,
        ReminderJobError,
        reminder::{DispatchReport, SingleReminderResult},
    },
};

/// 通知 API の共有状態
pub struct NotificationState {
    pub dispatcher:       Arc<ReminderDispatcher>,
    pub job:              Arc<ReminderJob>,
    pub settings:         ReminderSettings,
    /// メールプロバイダの認証情報が揃っているか
    pub email_configured: bool,
    /// SMS プロバイダの認証情報が揃っているか
    pub sms_configured:   bool,
}

// --- リクエスト/レスポンス型 ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub email_enabled: bool,
    pub sms_enabled:   bool,
    pub days_before:   u32,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
    pub config:  ChannelSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub email_enabled:    bool,
    pub sms_enabled:      bool,
    pub days_before:      u32,
    pub schedule:         String,
    pub timezone:         String,
    pub email_configured: bool,
    pub sms_configured:   bool,
}

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub success: bool,
    pub message: String,
    pub results: DispatchReport,
}

#[derive(Debug, Serialize)]
pub struct SingleReminderResponse {
    pub success: bool,
    pub message: String,
    pub result:  SingleReminderResult,
}

/// `POST /send` のリクエスト
///
/// 欠落は 400 で返すため、どちらも `Option` で受ける。
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub payments: Option<Vec<Payment>>,
    #[serde(default)]
    pub tenants:  Option<Vec<Tenant>>,
}

/// `POST /send-single` のリクエスト
#[derive(Debug, Deserialize)]
pub struct SendSingleRequest {
    #[serde(default)]
    pub payment: Option<Payment>,
    #[serde(default)]
    pub tenant:  Option<Tenant>,
}

// --- ハンドラ ---

/// GET /api/notifications/test
pub async fn get_status(State(state): State<Arc<NotificationState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        message: "Notification service is operational".to_string(),
        config:  ChannelSummary {
            email_enabled: state.settings.email_enabled,
            sms_enabled:   state.settings.sms_enabled,
            days_before:   state.settings.days_before_due,
        },
    })
}

/// GET /api/notifications/config
pub async fn get_config(State(state): State<Arc<NotificationState>>) -> Json<ConfigResponse> {
    let settings = &state.settings;
    Json(ConfigResponse {
        email_enabled:    settings.email_enabled,
        sms_enabled:      settings.sms_enabled,
        days_before:      settings.days_before_due,
        schedule:         settings.schedule.clone(),
        timezone:         settings.timezone.to_string(),
        email_configured: state.email_configured,
        sms_configured:   state.sms_configured,
    })
}

/// POST /api/notifications/trigger
///
/// データソースの支払いに対してリマインダージョブを実行し、集計結果を返す。
#[tracing::instrument(skip_all)]
pub async fn trigger_reminder_job(
    State(state): State<Arc<NotificationState>>,
) -> Result<Json<DispatchResponse>, ServiceError> {
    tracing::info!("リマインダージョブの手動実行を受け付けました");

    let report = state.job.run().await.map_err(|e| match e {
        ReminderJobError::AlreadyRunning => {
            ServiceError::Conflict("Reminder job is already running".to_string())
        }
        ReminderJobError::Source(_) => ServiceError::internal("Failed to trigger reminder job", e),
    })?;

    Ok(Json(DispatchResponse {
        success: true,
        message: "Reminder job executed".to_string(),
        results: report,
    }))
}

/// POST /api/notifications/send
///
/// 渡された支払い・入居者の一覧にリマインダーを送信する。送信可否の判定は通常どおり行う。
#[tracing::instrument(skip_all)]
pub async fn send_reminders(
    State(state): State<Arc<NotificationState>>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<DispatchResponse>, ServiceError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let (Some(payments), Some(tenants)) = (request.payments, request.tenants) else {
        return Err(ServiceError::BadRequest(
            "Missing required fields: payments and tenants".to_string(),
        ));
    };

    let report = state.dispatcher.dispatch(&payments, &tenants).await;

    Ok(Json(DispatchResponse {
        success: true,
        message: "Reminders processed".to_string(),
        results: report,
    }))
}

/// POST /api/notifications/send-single
///
/// 支払い 1 件に、ステータスや期日に関係なくリマインダーを送信する。
#[tracing::instrument(skip_all)]
pub async fn send_single_reminder(
    State(state): State<Arc<NotificationState>>,
    payload: Result<Json<SendSingleRequest>, JsonRejection>,
) -> Result<Json<SingleReminderResponse>, ServiceError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let (Some(payment), Some(tenant)) = (request.payment, request.tenant) else {
        return Err(ServiceError::BadRequest(
            "Missing required fields: payment and tenant".to_string(),
        ));
    };

    let result = state
        .dispatcher
        .send_single(&payment, &tenant)
        .await
        .map_err(|e| ServiceError::BadRequest(format!("Invalid payment: {e}")))?;

    let message = if result.success {
        "Reminder sent successfully"
    } else {
        "Failed to send reminder"
    };

    Ok(Json(SingleReminderResponse {
        success: result.success,
        message: message.to_string(),
        result,
    }))
}

fn invalid_body(rejection: JsonRejection) -> ServiceError {
    ServiceError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}
