//! # PG Manager インフラ層
//!
//! 外部プロバイダとの通信とデータソースを担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはリマインダー送信に必要な外部依存（メール・SMS プロバイダ、支払いデータ）を
//! トレイトの背後に隠す。サービス層はトレイトだけに依存し、実装は起動時に環境変数で選ぶ。
//!
//! ## 責務
//!
//! - **メール送信**: SMTP（lettre）、SES（aws-sdk-sesv2）、Noop
//! - **SMS 送信**: Twilio REST API（reqwest）、Noop
//! - **データソース**: 支払い・入居者リポジトリ（インメモリ実装と開発用フィクスチャ）
//!
//! ## 依存関係
//!
//! ```text
//! reminder-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信
//! - [`sms`] - SMS 送信
//! - [`repository`] - 支払い・入居者リポジトリ
//! - [`fixture`] - 開発用サンプルデータ
//! - [`error`] - インフラ層エラー定義

pub mod error;
pub mod fixture;
pub mod notification;
pub mod repository;
pub mod sms;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::InfraError;
pub use notification::EmailSender;
pub use sms::SmsSender;
