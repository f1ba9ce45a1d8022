//! # Clock（時刻プロバイダ）
//!
//! `Utc::now()` の直接呼び出しを置き換え、
//! テストで固定時刻を注入可能にするための抽象化。

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;

   /// 指定タイムゾーンでの「今日」の暦日
   ///
   /// リマインダー判定は時刻を持たない暦日で比較するため、
   /// 運用タイムゾーン（既定: Asia/Kolkata）で日付に落とす。
   fn today(&self, timezone: Tz) -> NaiveDate {
      self.now().with_timezone(&timezone).date_naive()
   }
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}
