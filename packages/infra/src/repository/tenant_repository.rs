//! # TenantRepository
//!
//! リマインダーの宛先となる入居者の読み込みを担当するリポジトリ。

use std::sync::Arc;

use async_trait::async_trait;
use pgmanager_domain::tenant::Tenant;

use crate::error::InfraError;

/// 入居者リポジトリトレイト
#[async_trait]
pub trait TenantRepository: Send + Sync {
   /// すべての入居者を取得する
   ///
   /// 支払いとの突き合わせは一覧の先頭から行うため、並び順はデータソースの順序を保つ。
   async fn find_all(&self) -> Result<Vec<Tenant>, InfraError>;
}

/// インメモリ実装の TenantRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantRepository {
   tenants: Arc<Vec<Tenant>>,
}

impl InMemoryTenantRepository {
   pub fn new(tenants: Vec<Tenant>) -> Self {
      Self {
         tenants: Arc::new(tenants),
      }
   }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
   async fn find_all(&self) -> Result<Vec<Tenant>, InfraError> {
      Ok(self.tenants.as_ref().clone())
   }
}

#[cfg(test)]
mod tests {
   use pgmanager_domain::tenant::TenantId;
   use pretty_assertions::assert_eq;

   use super::*;

   #[tokio::test]
   async fn find_allは登録した入居者を返す() {
      let tenant = Tenant::new(TenantId::new(1), "Rahul Sharma").with_phone("+919876543210");
      let repo = InMemoryTenantRepository::new(vec![tenant.clone()]);

      assert_eq!(repo.find_all().await.unwrap(), vec![tenant]);
   }
}
