//! # リポジトリ
//!
//! リマインダージョブが読み込む支払い・入居者のデータソースを抽象化する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: リマインダーは支払い・入居者を更新しない
//! - **テスタビリティ**: トレイト経由でモック可能な設計
//! - **差し替え可能**: 現在はインメモリ実装のみ。管理画面のデータベースに接続する実装は
//!   同じトレイトを実装して起動時に差し替える

pub mod payment_repository;
pub mod tenant_repository;

pub use payment_repository::{InMemoryPaymentRepository, PaymentRepository};
pub use tenant_repository::{InMemoryTenantRepository, TenantRepository};
