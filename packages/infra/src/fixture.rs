//! # 開発用サンプルデータ
//!
//! 管理画面のデータベースに接続しない環境で、リマインダージョブを動かすためのデータ。
//! 期日は「今日」からの相対日付で作るため、いつ起動しても送信対象になる。
//!
//! | 支払い | 入居者 | 部屋 | 金額 | 期日 | ステータス |
//! |---|---|---|---|---|---|
//! | 1 | Rahul Sharma | 101 | 8,000 | 2 日後 | Pending |
//! | 2 | Priya Patel | 102 | 12,000 | 昨日 | Overdue |

use chrono::{Days, NaiveDate};
use pgmanager_domain::{
    payment::{Payment, PaymentId, PaymentStatus},
    tenant::{Tenant, TenantId},
};
use rust_decimal::Decimal;

use crate::error::InfraError;

/// サンプルの入居者
pub fn sample_tenants() -> Vec<Tenant> {
    vec![
        Tenant::new(TenantId::new(1), "Rahul Sharma")
            .with_email("rahul.sharma@example.com")
            .with_phone("+919876543210"),
        Tenant::new(TenantId::new(2), "Priya Patel")
            .with_email("priya.patel@example.com")
            .with_phone("+919876543211"),
    ]
}

/// `today` を基準にしたサンプルの支払い
pub fn sample_payments(today: NaiveDate) -> Result<Vec<Payment>, InfraError> {
    let due_soon = today
        .checked_add_days(Days::new(2))
        .ok_or_else(|| InfraError::unexpected(format!("日付が範囲外です: {today} + 2 日")))?;
    let overdue = today
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| InfraError::unexpected(format!("日付が範囲外です: {today} - 1 日")))?;

    Ok(vec![
        Payment {
            id:        PaymentId::new(1),
            tenant:    "Rahul Sharma".to_string(),
            tenant_id: Some(TenantId::new(1)),
            room:      "101".to_string(),
            amount:    Decimal::from(8000),
            due_date:  due_soon.format("%Y-%m-%d").to_string(),
            status:    PaymentStatus::Pending,
        },
        Payment {
            id:        PaymentId::new(2),
            tenant:    "Priya Patel".to_string(),
            tenant_id: Some(TenantId::new(2)),
            room:      "102".to_string(),
            amount:    Decimal::from(12000),
            due_date:  overdue.format("%Y-%m-%d").to_string(),
            status:    PaymentStatus::Overdue,
        },
    ])
}
