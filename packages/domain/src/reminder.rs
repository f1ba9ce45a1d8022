//! # リマインダー判定
//!
//! 支払い 1 件について、今日リマインダーを送るべきかを判定する純粋関数。
//! I/O を持たず、「今日」は呼び出し元が [`Clock`](crate::clock::Clock) から求めて渡す。
//!
//! ## 判定ルール
//!
//! - 期日が今日より前なら延滞。延滞は何日過ぎていても送信対象
//! - 期日当日は延滞ではなく「期日間近」として送信対象
//! - 期日まで `days_before_due` 日以内なら送信対象
//!
//! 送信履歴は持たないため、同じ日に複数回実行すれば同じ支払いに複数回送信する。

use chrono::NaiveDate;
use serde::Serialize;

use crate::payment::{DueDate, PaymentStatus};

/// 期日の何日前から送信するかの既定値
pub const DEFAULT_DAYS_BEFORE_DUE: u32 = 3;

/// リマインダー送信ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    pub days_before_due: u32,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            days_before_due: DEFAULT_DAYS_BEFORE_DUE,
        }
    }
}

/// 判定結果（永続化しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDecision {
    pub is_overdue:     bool,
    pub days_until_due: i64,
    pub should_send:    bool,
}

impl ReminderPolicy {
    pub fn new(days_before_due: u32) -> Self {
        Self { days_before_due }
    }

    /// 支払い 1 件の送信可否を判定する
    ///
    /// `Paid` の支払いは期日に関係なく送信しない（延滞扱いもしない）。
    pub fn decide(&self, status: PaymentStatus, due_date: DueDate, today: NaiveDate) -> ReminderDecision {
        let days_until_due = due_date.days_from(today);

        if status.is_paid() {
            return ReminderDecision {
                is_overdue: false,
                days_until_due,
                should_send: false,
            };
        }

        let is_overdue = due_date.is_overdue(today);
        let due_soon = (0..=i64::from(self.days_before_due)).contains(&days_until_due);

        ReminderDecision {
            is_overdue,
            days_until_due,
            should_send: is_overdue || due_soon,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn due_in(days: i64) -> DueDate {
        let date = if days >= 0 {
            today().checked_add_days(Days::new(days as u64))
        } else {
            today().checked_sub_days(Days::new(days.unsigned_abs()))
        };
        DueDate::new(date.unwrap())
    }

    #[rstest]
    #[case::期日2日前(PaymentStatus::Pending, 2, false, true)]
    #[case::期日5日超過(PaymentStatus::Overdue, -5, true, true)]
    #[case::期日10日前(PaymentStatus::Pending, 10, false, false)]
    #[case::期日当日(PaymentStatus::Pending, 0, false, true)]
    #[case::閾値ちょうど(PaymentStatus::Partial, 3, false, true)]
    #[case::閾値の翌日(PaymentStatus::Partial, 4, false, false)]
    #[case::ステータスがpendingでも期日超過なら延滞(PaymentStatus::Pending, -1, true, true)]
    #[case::一年前の延滞も送信する(PaymentStatus::Overdue, -365, true, true)]
    #[case::期日前ならoverdueステータスでも延滞扱いしない(PaymentStatus::Overdue, 1, false, true)]
    fn 期日と閾値から送信可否を判定する(
        #[case] status: PaymentStatus,
        #[case] days: i64,
        #[case] expected_overdue: bool,
        #[case] expected_send: bool,
    ) {
        let decision = ReminderPolicy::new(3).decide(status, due_in(days), today());

        assert_eq!(
            decision,
            ReminderDecision {
                is_overdue:     expected_overdue,
                days_until_due: days,
                should_send:    expected_send,
            }
        );
    }

    #[rstest]
    #[case(-1)]
    #[case(0)]
    #[case(2)]
    fn paidは期日に関係なく送信しない(#[case] days: i64) {
        let decision = ReminderPolicy::default().decide(PaymentStatus::Paid, due_in(days), today());

        assert!(!decision.should_send);
        assert!(!decision.is_overdue);
    }

    #[test]
    fn 閾値0では期日当日と延滞のみ送信する() {
        let policy = ReminderPolicy::new(0);

        assert!(policy.decide(PaymentStatus::Pending, due_in(0), today()).should_send);
        assert!(policy.decide(PaymentStatus::Pending, due_in(-2), today()).should_send);
        assert!(!policy.decide(PaymentStatus::Pending, due_in(1), today()).should_send);
    }

    #[test]
    fn 既定の閾値は3日() {
        assert_eq!(ReminderPolicy::default().days_before_due, 3);
    }

    #[test]
    fn 判定結果はcamel_caseでシリアライズする() {
        let decision = ReminderPolicy::default().decide(PaymentStatus::Pending, due_in(2), today());

        assert_eq!(
            serde_json::to_value(decision).unwrap(),
            serde_json::json!({ "isOverdue": false, "daysUntilDue": 2, "shouldSend": true })
        );
    }
}
