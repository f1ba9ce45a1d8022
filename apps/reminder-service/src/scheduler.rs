//! # リマインダースケジューラー
//!
//! cron 式に従って [`ReminderJob`] を定期実行するバックグラウンドタスクを所有する。
//!
//! - 次回の実行時刻は設定タイムゾーンでの現在時刻（[`Clock`]）から計算する
//! - 5 フィールドの cron 式（分 時 日 月 曜日）は秒フィールド `0` を補って解釈する
//! - 開発環境では起動から `startup_delay` 後に 1 回だけ追加で実行する
//! - `stop()` で停止シグナルを送り、タスクの終了を待つ。`stop()` せずに破棄した場合はタスクを中断する

use std::{str::FromStr, sync::Arc, time::Duration};

use chrono::DateTime;
use chrono_tz::Tz;
use cron::Schedule;
use pgmanager_domain::clock::Clock;
use thiserror::Error;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};

use crate::usecase::{ReminderJob, ReminderJobError};

/// スケジューラーのエラー
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("cron 式 `{expression}` が不正です: {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("スケジューラーは既に起動しています")]
    AlreadyStarted,
}

struct RunningTask {
    shutdown: watch::Sender<bool>,
    handle:   JoinHandle<()>,
}

/// リマインダースケジューラー
pub struct ReminderScheduler {
    job:           Arc<ReminderJob>,
    schedule:      Schedule,
    timezone:      Tz,
    clock:         Arc<dyn Clock>,
    startup_delay: Option<Duration>,
    running:       Mutex<Option<RunningTask>>,
}

impl ReminderScheduler {
    /// cron 式を解釈してスケジューラーを作る（まだ起動しない）
    pub fn new(
        job: Arc<ReminderJob>,
        expression: &str,
        timezone: Tz,
        clock: Arc<dyn Clock>,
        startup_delay: Option<Duration>,
    ) -> Result<Self, SchedulerError> {
        let schedule = parse_schedule(expression)?;

        Ok(Self {
            job,
            schedule,
            timezone,
            clock,
            startup_delay,
            running: Mutex::new(None),
        })
    }

    /// 現在時刻より後の次回実行時刻
    pub fn next_fire_time(&self) -> Option<DateTime<Tz>> {
        next_fire_time(&self.schedule, self.clock.as_ref(), self.timezone)
    }

    /// バックグラウンドタスクを起動する
    pub async fn start(&self) -> Result<(), SchedulerError> {
        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|task| !task.handle.is_finished()) {
            return Err(SchedulerError::AlreadyStarted);
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            self.job.clone(),
            self.schedule.clone(),
            self.timezone,
            self.clock.clone(),
            self.startup_delay,
            shutdown_rx,
        ));

        tracing::info!(
            schedule = %self.schedule,
            timezone = %self.timezone,
            next_run = ?self.next_fire_time(),
            startup_delay_secs = self.startup_delay.map(|d| d.as_secs()),
            "リマインダースケジューラーを起動しました"
        );

        *running = Some(RunningTask { shutdown, handle });
        Ok(())
    }

    /// 停止シグナルを送り、実行中のジョブがあれば完了を待つ
    pub async fn stop(&self) {
        let Some(task) = self.running.lock().await.take() else {
            return;
        };

        // 受信側がすでに終了していれば送信に失敗するが、その場合も join するだけでよい
        let _ = task.shutdown.send(true);
        if let Err(e) = task.handle.await {
            tracing::warn!("スケジューラータスクが異常終了しました: {e}");
        }

        tracing::info!("リマインダースケジューラーを停止しました");
    }

    /// バックグラウンドタスクが動作中か
    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.running.get_mut().take() {
            task.handle.abort();
        }
    }
}

/// 5 フィールドの cron 式には秒フィールドを補う
fn normalize_expression(expression: &str) -> String {
    let expression = expression.trim();
    if expression.split_whitespace().count() == 5 {
        format!("0 {expression}")
    } else {
        expression.to_string()
    }
}

fn parse_schedule(expression: &str) -> Result<Schedule, SchedulerError> {
    Schedule::from_str(&normalize_expression(expression)).map_err(|e| {
        SchedulerError::InvalidSchedule {
            expression: expression.to_string(),
            reason:     e.to_string(),
        }
    })
}

fn next_fire_time(schedule: &Schedule, clock: &dyn Clock, timezone: Tz) -> Option<DateTime<Tz>> {
    let now = clock.now().with_timezone(&timezone);
    schedule.after(&now).next()
}

async fn run_loop(
    job: Arc<ReminderJob>,
    schedule: Schedule,
    timezone: Tz,
    clock: Arc<dyn Clock>,
    startup_delay: Option<Duration>,
    mut shutdown: watch::Receiver<bool>,
) {
    if let Some(delay) = startup_delay {
        tokio::select! {
            () = tokio::time::sleep(delay) => run_job(&job, "startup").await,
            _ = shutdown.changed() => return,
        }
    }

    loop {
        let Some(next) = next_fire_time(&schedule, clock.as_ref(), timezone) else {
            tracing::warn!(schedule = %schedule, "次回の実行時刻がありません。スケジューラーを終了します");
            return;
        };
        let wait = (next.with_timezone(&chrono::Utc) - clock.now())
            .to_std()
            .unwrap_or_default();

        tracing::debug!(next_run = %next, wait_secs = wait.as_secs(), "次回のリマインダージョブを待機します");

        tokio::select! {
            () = tokio::time::sleep(wait) => run_job(&job, "schedule").await,
            _ = shutdown.changed() => return,
        }
    }
}

async fn run_job(job: &ReminderJob, trigger: &'static str) {
    tracing::info!(trigger, "リマインダージョブを実行します");

    match job.run().await {
        Ok(_) => {}
        Err(ReminderJobError::AlreadyRunning) => {
            tracing::warn!(trigger, "前回のリマインダージョブが実行中のため、今回の実行を見送りました");
        }
        // データソースのエラーはジョブ側でログ出力済み
        Err(ReminderJobError::Source(_)) => {}
    }
}
