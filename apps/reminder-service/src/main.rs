//! # リマインダーサービス
//!
//! 通知 API サーバーとリマインダースケジューラーを 1 プロセスで起動する。
//!
//! ## 環境変数（抜粋）
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|------------|------|
//! | `HOST` / `PORT` | `0.0.0.0` / `3001` | バインドアドレス |
//! | `APP_ENV` | `production` | `development` なら起動直後にもジョブを実行 |
//! | `ENABLE_EMAIL_REMINDERS` | `false` | メール送信の有効化 |
//! | `ENABLE_SMS_REMINDERS` | `false` | SMS 送信の有効化 |
//! | `DAYS_BEFORE_DUE` | `3` | 期日の何日前から送信するか |
//! | `REMINDER_SCHEDULE` | `0 9 * * *` | cron 式 |
//! | `REMINDER_TIMEZONE` | `Asia/Kolkata` | スケジュールと「今日」のタイムゾーン |
//! | `LOG_FORMAT` | 本番 `json` / 開発 `pretty` | ログ出力形式（`compact` も可） |
//!
//! 全項目は [`pgmanager_reminder_service::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p pgmanager-reminder-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use pgmanager_domain::clock::{Clock, SystemClock};
use pgmanager_infra::{
    EmailSender,
    SmsSender,
    fixture,
    notification::{NoopEmailSender, SesEmailSender, SmtpEmailSender},
    repository::{InMemoryPaymentRepository, InMemoryTenantRepository},
    sms::{NoopSmsSender, TwilioSmsSender},
};
use pgmanager_reminder_service::{
    config::{EmailBackend, EmailConfig, ServiceConfig, SmsBackend, SmsConfig},
    handler::NotificationState,
    router,
    scheduler::ReminderScheduler,
    usecase::{
        ReminderDispatcher,
        ReminderJob,
        reminder::{EmailChannel, SmsChannel, TemplateRenderer},
    },
};
use pgmanager_shared::observability::{LoggingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let _app_span = init_tracing(&LoggingConfig::from_env("reminder-service"));

    let config = ServiceConfig::from_env()?;

    tracing::info!(
        email_enabled = config.reminder.email_enabled,
        sms_enabled = config.reminder.sms_enabled,
        days_before_due = config.reminder.days_before_due,
        "リマインダーサービスを起動します: {}:{}",
        config.host,
        config.port
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let renderer = Arc::new(TemplateRenderer::new()?);

    let email_channel = EmailChannel::new(
        config.reminder.email_enabled,
        build_email_sender(&config.email).await,
        renderer.clone(),
        clock.clone(),
        config.reminder.timezone,
        config.reminder.send_timeout,
    );
    let sms_channel = SmsChannel::new(
        config.reminder.sms_enabled,
        build_sms_sender(&config.sms),
        renderer,
        config.reminder.send_timeout,
    );
    let dispatcher = Arc::new(ReminderDispatcher::new(
        Arc::new(email_channel),
        Arc::new(sms_channel),
        &config.reminder,
        clock.clone(),
    ));

    // 管理画面のデータベースに接続するまでは開発用のサンプルデータを使う
    let today = clock.today(config.reminder.timezone);
    let job = Arc::new(ReminderJob::new(
        dispatcher.clone(),
        Arc::new(InMemoryPaymentRepository::new(fixture::sample_payments(today)?)),
        Arc::new(InMemoryTenantRepository::new(fixture::sample_tenants())),
    ));

    let startup_delay = config.is_development().then_some(config.startup_delay);
    let scheduler = match ReminderScheduler::new(
        job.clone(),
        &config.reminder.schedule,
        config.reminder.timezone,
        clock,
        startup_delay,
    ) {
        Ok(scheduler) => {
            scheduler.start().await?;
            Some(scheduler)
        }
        Err(e) => {
            tracing::error!("スケジューラーを起動できません。手動実行のみ受け付けます: {e}");
            None
        }
    };

    let state = Arc::new(NotificationState {
        dispatcher,
        job,
        settings: config.reminder.clone(),
        email_configured: config.email.is_configured(),
        sms_configured: config.sms.is_configured(),
    });
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("リマインダーサービスが起動しました: {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("シグナルの待機に失敗しました: {e}");
            }
        })
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }

    Ok(())
}

/// メール送信バックエンドを構築する（認証情報が無ければ `None`）
async fn build_email_sender(config: &EmailConfig) -> Option<Arc<dyn EmailSender>> {
    match config.backend {
        EmailBackend::Noop => Some(Arc::new(NoopEmailSender)),
        EmailBackend::Ses => {
            let from_address = config.from_address.clone()?;
            let aws_config = aws_config::load_from_env().await;
            let client = aws_sdk_sesv2::Client::new(&aws_config);
            Some(Arc::new(SesEmailSender::new(client, from_address)))
        }
        EmailBackend::Smtp => {
            let settings = config.smtp_settings()?;
            match SmtpEmailSender::new(settings) {
                Ok(sender) => Some(Arc::new(sender)),
                Err(e) => {
                    tracing::error!("SMTP 送信の初期化に失敗しました: {e}");
                    None
                }
            }
        }
    }
}

/// SMS 送信バックエンドを構築する（認証情報が無ければ `None`）
fn build_sms_sender(config: &SmsConfig) -> Option<Arc<dyn SmsSender>> {
    match config.backend {
        SmsBackend::Noop => Some(Arc::new(NoopSmsSender)),
        SmsBackend::Twilio => Some(Arc::new(TwilioSmsSender::new(config.twilio_credentials()?))),
    }
}
