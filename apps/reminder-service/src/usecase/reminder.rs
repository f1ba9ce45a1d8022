//! # リマインダーユースケース
//!
//! 支払いリマインダーの判定・送信・集計を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール・SMS 本文の生成
//! - [`channel`] - チャネル（メール・SMS）ごとの送信と結果の変換
//! - [`dispatcher`] - 支払いの一覧への一括送信と集計
//! - [`job`] - データソースの読み込みと多重実行の防止

pub mod channel;
pub mod dispatcher;
pub mod job;
pub mod template_renderer;

pub use channel::{EmailChannel, ReminderChannel, SmsChannel};
pub use dispatcher::{DispatchReport, ReminderDetail, ReminderDispatcher, SingleReminderResult};
pub use job::{ReminderJob, ReminderJobError};
pub use template_renderer::TemplateRenderer;
