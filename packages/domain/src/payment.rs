//! # 支払い
//!
//! 家賃などの請求 1 件を表す。リマインダー判定の入力となる。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`Payment`] | 支払い | 呼び出し元から渡される。永続化はしない |
//! | [`PaymentStatus`] | 支払いステータス | `Paid` の支払いは常にリマインダー対象外 |
//! | [`Amount`] | 金額 | 正の数のみ |
//! | [`DueDate`] | 期日 | 時刻を持たない暦日 |
//!
//! ## 期日の扱い
//!
//! 期日は文字列のまま受け取り、リマインダー判定の直前に [`DueDate::parse`] で解釈する。
//! 解釈できない期日はその支払い 1 件の失敗として扱い、バッチ全体は止めない。
//! 金額も同様に数値のまま受け取り、[`Payment::validated_amount`] で検証する。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{
    DomainError,
    tenant::{Tenant, TenantId},
};

define_numeric_id! {
    /// 支払い ID（1 回のバッチ内で一意）
    pub struct PaymentId;
}

/// 支払いステータス
///
/// 呼び出し元が管理する正のステータス。リマインダー判定では `Paid` かどうかだけを見る。
/// `Overdue` であっても期日から改めて延滞判定を行う。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
    Partial,
}

impl PaymentStatus {
    pub fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// 金額（正の数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "金額は正の数である必要があります: {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// インド式の桁区切りで表記する（例: `120000` → `1,20,000`）
    ///
    /// 小数部は 2 桁に丸め、末尾の 0 は出力しない。
    pub fn to_indian_grouping(&self) -> String {
        let text = self.0.round_dp(2).normalize().to_string();
        match text.split_once('.') {
            Some((integer, fraction)) => format!("{}.{fraction}", group_indian(integer)),
            None => group_indian(&text),
        }
    }
}

/// 下 3 桁、以降 2 桁ごとに区切る
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{last_three}", groups.join(","))
}

/// 期日（暦日）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DueDate(NaiveDate);

impl DueDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// 期日文字列を暦日として解釈する
    ///
    /// 受け付ける形式:
    ///
    /// - `YYYY-MM-DD`
    /// - RFC 3339 のタイムスタンプ（`timezone` に変換してから日付を取る）
    /// - オフセットなしの `YYYY-MM-DDTHH:MM[:SS[.fff]]`
    pub fn parse(raw: &str, timezone: Tz) -> Result<Self, DomainError> {
        let trimmed = raw.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(datetime.with_timezone(&timezone).date_naive()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(datetime.date()));
            }
        }

        Err(DomainError::InvalidDueDate(raw.to_string()))
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// 今日から期日までの日数（期日を過ぎていれば負）
    pub fn days_from(&self, today: NaiveDate) -> i64 {
        self.0.signed_duration_since(today).num_days()
    }

    /// 期日が今日より前か（期日当日は延滞ではない）
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.0 < today
    }
}

/// 支払い
///
/// 管理画面・データソースから渡される支払い 1 件。
/// 支払い方法や領収書番号など、リマインダーに不要な項目はデシリアライズ時に無視する。
/// 部屋番号・金額・期日が欠けていてもデシリアライズは通し、不備は支払い 1 件の失敗として扱う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id:        PaymentId,
    /// 入居者の表示名
    #[serde(default)]
    pub tenant:    String,
    /// 入居者 ID（管理画面の古いデータには無いことがある）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// 部屋番号（表示用）
    #[serde(default)]
    pub room:      String,
    /// 金額（未検証の数値）
    #[serde(default)]
    pub amount:    Decimal,
    /// 期日（未解釈の文字列）
    #[serde(default)]
    pub due_date:  String,
    pub status:    PaymentStatus,
}

impl Payment {
    /// 入居者一覧からこの支払いの入居者を探す
    ///
    /// `tenant_id` が入居者 ID に一致する、または表示名が入居者名に一致する
    /// 最初の入居者を返す。どちらで一致したかは区別しない（一覧の順で先勝ち）。
    pub fn find_tenant<'a>(&self, tenants: &'a [Tenant]) -> Option<&'a Tenant> {
        tenants.iter().find(|tenant| {
            self.tenant_id == Some(tenant.id)
                || (!self.tenant.is_empty() && tenant.name == self.tenant)
        })
    }

    pub fn parse_due_date(&self, timezone: Tz) -> Result<DueDate, DomainError> {
        DueDate::parse(&self.due_date, timezone)
    }

    /// 金額が正の数であることを検証する
    pub fn validated_amount(&self) -> Result<Amount, DomainError> {
        Amount::new(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono_tz::Asia::Kolkata;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_payment(tenant: &str, tenant_id: Option<u64>) -> Payment {
        Payment {
            id:        PaymentId::new(1),
            tenant:    tenant.to_string(),
            tenant_id: tenant_id.map(TenantId::new),
            room:      "101".to_string(),
            amount:    dec!(8000),
            due_date:  "2025-03-12".to_string(),
            status:    PaymentStatus::Pending,
        }
    }

    // ===== PaymentStatus =====

    #[test]
    fn payment_statusの文字列変換が管理画面の表記と一致する() {
        assert_eq!(PaymentStatus::Paid.to_string(), "Paid");
        assert_eq!(PaymentStatus::from_str("Partial").unwrap(), PaymentStatus::Partial);
        assert_eq!(
            serde_json::to_value(PaymentStatus::Overdue).unwrap(),
            serde_json::json!("Overdue")
        );
    }

    #[test]
    fn paidだけがis_paidになる() {
        assert!(PaymentStatus::Paid.is_paid());
        assert!(!PaymentStatus::Pending.is_paid());
        assert!(!PaymentStatus::Overdue.is_paid());
        assert!(!PaymentStatus::Partial.is_paid());
    }

    // ===== Amount =====

    #[test]
    fn 金額は正の数のみ受け付ける() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(Amount::new(dec!(0)).is_err());
        assert!(Amount::new(dec!(-500)).is_err());
    }

    #[rstest]
    #[case(dec!(500), "500")]
    #[case(dec!(8000), "8,000")]
    #[case(dec!(12000), "12,000")]
    #[case(dec!(120000), "1,20,000")]
    #[case(dec!(12345678), "1,23,45,678")]
    #[case(dec!(1234.5), "1,234.5")]
    #[case(dec!(8000.00), "8,000")]
    #[case(dec!(99.999), "100")]
    fn 金額をインド式の桁区切りで表記する(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(Amount::new(value).unwrap().to_indian_grouping(), expected);
    }

    #[test]
    fn 正でない金額の支払いもデシリアライズでき検証で弾く() {
        let json = r#"{"id": 1, "tenant": "Rahul Sharma", "room": "101",
            "amount": 0, "dueDate": "2025-03-12", "status": "Pending"}"#;

        let payment: Payment = serde_json::from_str(json).unwrap();

        assert_eq!(payment.amount, dec!(0));
        assert!(matches!(payment.validated_amount(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn 支払い済みの記録は部屋番号や期日が無くても読み込める() {
        let payment: Payment =
            serde_json::from_str(r#"{"id": 1, "status": "Paid", "amount": 0}"#).unwrap();

        assert!(payment.status.is_paid());
        assert_eq!(payment.room, "");
        assert_eq!(payment.due_date, "");
    }

    #[test]
    fn 正の金額は検証を通る() {
        let payment = make_payment("Rahul Sharma", None);

        assert_eq!(payment.validated_amount().unwrap().value(), dec!(8000));
    }

    // ===== DueDate =====

    #[rstest]
    #[case("2025-03-12", date(2025, 3, 12))]
    #[case(" 2025-03-12 ", date(2025, 3, 12))]
    #[case("2025-03-12T10:30:00", date(2025, 3, 12))]
    #[case("2025-03-12T10:30:00.123", date(2025, 3, 12))]
    #[case("2025-03-12T10:30", date(2025, 3, 12))]
    #[case("2025-03-12T04:00:00+05:30", date(2025, 3, 12))]
    // UTC 20:00 は IST では翌日
    #[case("2025-03-12T20:00:00.000Z", date(2025, 3, 13))]
    fn 期日文字列を暦日として解釈する(#[case] raw: &str, #[case] expected: NaiveDate) {
        assert_eq!(DueDate::parse(raw, Kolkata).unwrap().as_naive(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("next friday")]
    #[case("2025-02-30")]
    #[case("12/03/2025")]
    fn 解釈できない期日はエラーになる(#[case] raw: &str) {
        assert_eq!(
            DueDate::parse(raw, Kolkata),
            Err(DomainError::InvalidDueDate(raw.to_string()))
        );
    }

    #[test]
    fn 期日までの日数は負にもなる() {
        let today = date(2025, 3, 10);

        assert_eq!(DueDate::new(date(2025, 3, 12)).days_from(today), 2);
        assert_eq!(DueDate::new(date(2025, 3, 10)).days_from(today), 0);
        assert_eq!(DueDate::new(date(2025, 3, 5)).days_from(today), -5);
    }

    #[test]
    fn 期日当日は延滞ではない() {
        let today = date(2025, 3, 10);

        assert!(!DueDate::new(today).is_overdue(today));
        assert!(DueDate::new(date(2025, 3, 9)).is_overdue(today));
        assert!(!DueDate::new(date(2025, 3, 11)).is_overdue(today));
    }

    // ===== Payment =====

    #[test]
    fn 管理画面のjsonから支払いをデシリアライズできる() {
        let json = r#"{
            "id": 2,
            "pgId": "pg1",
            "tenant": "Priya Patel",
            "tenantId": 2,
            "room": "102",
            "amount": 12000,
            "dueDate": "2025-03-09T00:00:00.000Z",
            "status": "Overdue",
            "paidDate": null,
            "paymentType": "Rent"
        }"#;

        let payment: Payment = serde_json::from_str(json).unwrap();

        assert_eq!(payment.id, PaymentId::new(2));
        assert_eq!(payment.tenant_id, Some(TenantId::new(2)));
        assert_eq!(payment.amount, dec!(12000));
        assert_eq!(payment.status, PaymentStatus::Overdue);
    }

    #[test]
    fn 入居者はidで解決できる() {
        let tenants = vec![
            Tenant::new(TenantId::new(1), "Rahul Sharma"),
            Tenant::new(TenantId::new(2), "Priya Patel"),
        ];

        let found = make_payment("", Some(2)).find_tenant(&tenants).unwrap();

        assert_eq!(found.name, "Priya Patel");
    }

    #[test]
    fn 入居者は名前でも解決できる() {
        let tenants = vec![Tenant::new(TenantId::new(9), "Rahul Sharma")];

        let found = make_payment("Rahul Sharma", None).find_tenant(&tenants).unwrap();

        assert_eq!(found.id, TenantId::new(9));
    }

    #[test]
    fn idと名前が別の入居者に一致する場合は一覧の先頭が勝つ() {
        let tenants = vec![
            Tenant::new(TenantId::new(5), "Rahul Sharma"),
            Tenant::new(TenantId::new(1), "Someone Else"),
        ];

        let found = make_payment("Rahul Sharma", Some(1))
            .find_tenant(&tenants)
            .unwrap();

        assert_eq!(found.id, TenantId::new(5));
    }

    #[test]
    fn 一致する入居者がいなければnone() {
        let tenants = vec![Tenant::new(TenantId::new(1), "Rahul Sharma")];

        assert!(make_payment("Priya Patel", Some(2)).find_tenant(&tenants).is_none());
    }

    #[test]
    fn 空の表示名は名前一致に使わない() {
        let tenants = vec![Tenant::new(TenantId::new(1), "")];

        assert!(make_payment("", None).find_tenant(&tenants).is_none());
    }
}
