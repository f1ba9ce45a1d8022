//! # PG Manager ドメイン層
//!
//! 家賃リマインダーの判定ロジックと、その入出力となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋なロジック**: I/O を一切持たない。現在時刻も [`clock::Clock`] で注入する
//! - **値オブジェクト**: 金額・期日・識別子は Newtype で表現し、取り違えを防ぐ
//! - **呼び出し元が正**: 支払いのステータスは呼び出し元から渡された値をそのまま信頼する
//!
//! ## 依存関係の方向
//!
//! ```text
//! reminder-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`payment`] - 支払い（金額、期日、ステータス）
//! - [`tenant`] - 入居者と連絡先
//! - [`reminder`] - リマインダー判定エンジン
//! - [`notification`] - 通知ペイロードとチャネルごとの送信結果
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod notification;
pub mod payment;
pub mod reminder;
pub mod tenant;

pub use error::DomainError;
