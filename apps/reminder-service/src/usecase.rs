//! # ユースケース層
//!
//! ハンドラとスケジューラーから呼ばれるアプリケーションロジックを配置する。

pub mod reminder;

pub use reminder::{ReminderDispatcher, ReminderJob, ReminderJobError};
