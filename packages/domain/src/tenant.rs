//! # 入居者
//!
//! リマインダーの宛先となる入居者と、その連絡先を定義する。
//!
//! ## 連絡先の扱い
//!
//! メールアドレス・電話番号はどちらも欠けていてよい。欠けているチャネルの送信は
//! 失敗として記録されるが、もう一方のチャネルの送信は妨げない。
//! 空文字列・空白のみの値は未設定と同じに扱う。

use serde::{Deserialize, Serialize};

define_numeric_id! {
    /// 入居者 ID
    pub struct TenantId;
}

/// 入居者
///
/// 呼び出し元（管理画面やデータソース）から渡される。
/// 部屋番号や入居日など、リマインダーに不要な項目はデシリアライズ時に無視する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id:    TenantId,
    pub name:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Tenant {
    pub fn new(id: TenantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// 送信に使えるメールアドレス
    pub fn email_address(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// 送信に使える電話番号（国番号付き、例: `+919876543210`）
    pub fn phone_number(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
