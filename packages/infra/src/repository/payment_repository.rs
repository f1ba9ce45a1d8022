//! # PaymentRepository
//!
//! リマインダー対象となる支払いの読み込みを担当するリポジトリ。

use std::sync::Arc;

use async_trait::async_trait;
use pgmanager_domain::payment::Payment;

use crate::error::InfraError;

/// 支払いリポジトリトレイト
#[async_trait]
pub trait PaymentRepository: Send + Sync {
   /// すべての支払いを取得する
   ///
   /// ステータスによる絞り込みは行わない（`Paid` の除外はディスパッチャーの責務）。
   /// 並び順はデータソースの順序を保つ。
   async fn find_all(&self) -> Result<Vec<Payment>, InfraError>;
}

/// インメモリ実装の PaymentRepository
///
/// 起動時に渡された支払い一覧をそのまま返す。
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
   payments: Arc<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
   pub fn new(payments: Vec<Payment>) -> Self {
      Self {
         payments: Arc::new(payments),
      }
   }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
   async fn find_all(&self) -> Result<Vec<Payment>, InfraError> {
      Ok(self.payments.as_ref().clone())
   }
}
