//! # リマインダーディスパッチャー
//!
//! 支払いの一覧に対してリマインダー判定を行い、入居者を解決してメール・SMS を送信し、
//! 結果を [`DispatchReport`] に集計する。
//!
//! ## 支払い 1 件の処理順
//!
//! 1. `Paid` ならスキップ（`details` には載せない）
//! 2. 期日を解釈し、金額を検証する。どちらかが不正なら処理済みかつ失敗として数え、次の支払いへ進む
//! 3. 送信可否を判定する
//! 4. 入居者を解決する。見つからなければスキップ
//! 5. 送信対象でなければスキップ
//! 6. メール、SMS の順に送信する（どちらか一方の成功で送信済み）
//!
//! 支払いは入力順に 1 件ずつ処理し、`details` は入力順を保つ。
//! すべての支払いは `skipped` か `processed`（= `sent` + `failed`）のどちらか一方に数えられる。

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use pgmanager_domain::{
    DomainError,
    clock::Clock,
    notification::{DeliveryResult, ReminderNotification},
    payment::{Amount, DueDate, Payment, PaymentId},
    reminder::ReminderPolicy,
    tenant::Tenant,
};
use pgmanager_shared::{
    event_log::{
        error::{category, kind},
        event,
    },
    log_business_event,
};
use serde::Serialize;

use super::ReminderChannel;
use crate::config::ReminderSettings;

/// 1 回のディスパッチの集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// 送信を試みた支払いと、期日や金額が不正だった支払いの数
    pub processed: usize,
    /// 少なくとも 1 チャネルで送信できた数
    pub sent:      usize,
    /// 全チャネルで失敗した数と、期日や金額が不正だった数
    pub failed:    usize,
    /// 支払い済み・入居者不明・送信対象外の数
    pub skipped:   usize,
    pub details:   Vec<ReminderDetail>,
}

/// 送信を試みた支払い 1 件の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDetail {
    pub payment_id:     PaymentId,
    pub tenant_name:    String,
    pub room:           String,
    pub email_result:   DeliveryResult,
    pub sms_result:     DeliveryResult,
    pub is_overdue:     bool,
    pub days_until_due: i64,
}

/// 手動送信 1 件の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleReminderResult {
    pub email_result: DeliveryResult,
    pub sms_result:   DeliveryResult,
    pub success:      bool,
}

/// リマインダーディスパッチャー
pub struct ReminderDispatcher {
    email:    Arc<dyn ReminderChannel>,
    sms:      Arc<dyn ReminderChannel>,
    policy:   ReminderPolicy,
    clock:    Arc<dyn Clock>,
    timezone: Tz,
}

impl ReminderDispatcher {
    pub fn new(
        email: Arc<dyn ReminderChannel>,
        sms: Arc<dyn ReminderChannel>,
        settings: &ReminderSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            email,
            sms,
            policy: settings.policy(),
            clock,
            timezone: settings.timezone,
        }
    }

    /// 支払いの一覧にリマインダーを送信する
    ///
    /// 支払い 1 件の失敗はバッチ全体を止めない。
    pub async fn dispatch(&self, payments: &[Payment], tenants: &[Tenant]) -> DispatchReport {
        let today = self.clock.today(self.timezone);
        let mut report = DispatchReport::default();

        for payment in payments {
            self.dispatch_one(payment, tenants, today, &mut report).await;
        }

        report
    }

    async fn dispatch_one(
        &self,
        payment: &Payment,
        tenants: &[Tenant],
        today: NaiveDate,
        report: &mut DispatchReport,
    ) {
        let payment_id = payment.id.to_string();

        if payment.status.is_paid() {
            report.skipped += 1;
            return;
        }

        let (due_date, amount) = match self.validate(payment) {
            Ok(validated) => validated,
            Err(e) => {
                let error_kind = match &e {
                    DomainError::InvalidDueDate(_) => kind::INVALID_DUE_DATE,
                    DomainError::Validation(_) => kind::INVALID_AMOUNT,
                };
                tracing::warn!(
                    event.category = event::category::REMINDER,
                    event.action = event::action::REMINDER_FAILED,
                    event.entity_type = event::entity_type::PAYMENT,
                    event.entity_id = %payment_id,
                    error.category = category::INPUT,
                    error.kind = error_kind,
                    "支払いの処理に失敗しました: {e}"
                );
                report.processed += 1;
                report.failed += 1;
                return;
            }
        };

        let decision = self.policy.decide(payment.status, due_date, today);

        let Some(tenant) = payment.find_tenant(tenants) else {
            tracing::warn!(
                event.category = event::category::REMINDER,
                event.action = event::action::REMINDER_SKIPPED,
                event.entity_type = event::entity_type::PAYMENT,
                event.entity_id = %payment_id,
                tenant = %payment.tenant,
                "入居者が見つからないためスキップします"
            );
            report.skipped += 1;
            return;
        };

        if !decision.should_send {
            tracing::debug!(
                payment_id = %payment_id,
                days_until_due = decision.days_until_due,
                "送信対象外のためスキップします"
            );
            report.skipped += 1;
            return;
        }

        report.processed += 1;

        let notification =
            ReminderNotification::new(payment, tenant, amount, due_date, decision.is_overdue);
        let email_result = self.email.send(&notification).await;
        let sms_result = self.sms.send(&notification).await;
        let success = email_result.success || sms_result.success;

        let (action, result) = if success {
            report.sent += 1;
            (event::action::REMINDER_SENT, event::result::SUCCESS)
        } else {
            report.failed += 1;
            (event::action::REMINDER_FAILED, event::result::FAILURE)
        };

        log_business_event!(
            event.category = event::category::REMINDER,
            event.action = action,
            event.entity_type = event::entity_type::PAYMENT,
            event.entity_id = %payment_id,
            event.result = result,
            tenant = %tenant.name,
            is_overdue = decision.is_overdue,
            days_until_due = decision.days_until_due,
            "リマインダーを処理しました"
        );

        report.details.push(ReminderDetail {
            payment_id: payment.id,
            tenant_name: tenant.name.clone(),
            room: payment.room.clone(),
            email_result,
            sms_result,
            is_overdue: decision.is_overdue,
            days_until_due: decision.days_until_due,
        });
    }

    /// 支払い 1 件に手動でリマインダーを送信する
    ///
    /// ステータスや期日による送信可否の判定は行わず、常に両チャネルで送信を試みる。
    /// 期日を解釈できない場合と金額が正でない場合のみエラーを返す。
    pub async fn send_single(
        &self,
        payment: &Payment,
        tenant: &Tenant,
    ) -> Result<SingleReminderResult, DomainError> {
        let today = self.clock.today(self.timezone);
        let (due_date, amount) = self.validate(payment)?;

        let notification = ReminderNotification::new(
            payment,
            tenant,
            amount,
            due_date,
            due_date.is_overdue(today),
        );
        let email_result = self.email.send(&notification).await;
        let sms_result = self.sms.send(&notification).await;

        Ok(SingleReminderResult {
            success: email_result.success || sms_result.success,
            email_result,
            sms_result,
        })
    }

    fn validate(&self, payment: &Payment) -> Result<(DueDate, Amount), DomainError> {
        let due_date = payment.parse_due_date(self.timezone)?;
        let amount = payment.validated_amount()?;
        Ok((due_date, amount))
    }
}
