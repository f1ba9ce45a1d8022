//! # リマインダージョブ
//!
//! データソースから支払い・入居者を読み込み、ディスパッチャーで一括送信する。
//! スケジューラーと `POST /api/notifications/trigger` の両方から呼ばれる。
//!
//! 同時に実行できるジョブは 1 つだけ。実行中に呼ばれた場合は待たずに
//! [`ReminderJobError::AlreadyRunning`] を返す。

use std::sync::Arc;

use pgmanager_infra::{
    InfraError,
    repository::{PaymentRepository, TenantRepository},
};
use pgmanager_shared::{
    event_log::{
        error::{category, kind},
        event,
    },
    log_business_event,
};
use thiserror::Error;
use tokio::sync::Mutex;

use super::{DispatchReport, ReminderDispatcher};

/// リマインダージョブのエラー
#[derive(Debug, Error)]
pub enum ReminderJobError {
    #[error("リマインダージョブは実行中です")]
    AlreadyRunning,

    #[error("データソースの読み込みに失敗しました: {0}")]
    Source(#[from] InfraError),
}

/// リマインダージョブ
pub struct ReminderJob {
    dispatcher: Arc<ReminderDispatcher>,
    payments:   Arc<dyn PaymentRepository>,
    tenants:    Arc<dyn TenantRepository>,
    running:    Mutex<()>,
}

impl ReminderJob {
    pub fn new(
        dispatcher: Arc<ReminderDispatcher>,
        payments: Arc<dyn PaymentRepository>,
        tenants: Arc<dyn TenantRepository>,
    ) -> Self {
        Self {
            dispatcher,
            payments,
            tenants,
            running: Mutex::new(()),
        }
    }

    /// ジョブを 1 回実行する
    #[tracing::instrument(skip_all, name = "reminder_job")]
    pub async fn run(&self) -> Result<DispatchReport, ReminderJobError> {
        let Ok(_guard) = self.running.try_lock() else {
            log_business_event!(
                event.category = event::category::REMINDER,
                event.action = event::action::REMINDER_JOB_SKIPPED,
                event.entity_type = event::entity_type::REMINDER_JOB,
                event.result = event::result::SKIPPED,
                "前回のリマインダージョブが実行中のためスキップします"
            );
            return Err(ReminderJobError::AlreadyRunning);
        };

        let result = self.load_and_dispatch().await;

        if let Err(ReminderJobError::Source(e)) = &result {
            tracing::error!(
                event.category = event::category::REMINDER,
                event.entity_type = event::entity_type::REMINDER_JOB,
                event.result = event::result::FAILURE,
                error.category = category::INFRASTRUCTURE,
                error.kind = kind::DATA_SOURCE,
                span_trace = %e.span_trace(),
                "リマインダージョブが失敗しました: {e}"
            );
        }

        result
    }

    async fn load_and_dispatch(&self) -> Result<DispatchReport, ReminderJobError> {
        let payments = self.payments.find_all().await?;
        let tenants = self.tenants.find_all().await?;

        log_business_event!(
            event.category = event::category::REMINDER,
            event.action = event::action::REMINDER_JOB_STARTED,
            event.entity_type = event::entity_type::REMINDER_JOB,
            event.result = event::result::SUCCESS,
            payments = payments.len(),
            tenants = tenants.len(),
            "リマインダージョブを開始します"
        );

        let report = self.dispatcher.dispatch(&payments, &tenants).await;

        log_business_event!(
            event.category = event::category::REMINDER,
            event.action = event::action::REMINDER_JOB_COMPLETED,
            event.entity_type = event::entity_type::REMINDER_JOB,
            event.result = event::result::SUCCESS,
            processed = report.processed,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "リマインダージョブが完了しました"
        );

        Ok(report)
    }

    /// ジョブが実行中か
    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }
}
