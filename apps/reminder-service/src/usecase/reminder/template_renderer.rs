//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンでリマインダーのメール（HTML / plaintext）と SMS 本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: 延滞なら `⚠️ OVERDUE: Rent Payment Reminder - Room {部屋番号}`、
//!   それ以外は `🔔 Rent Payment Reminder - Room {部屋番号}`
//! - **表記**: 金額はインド式の桁区切り（`₹1,20,000`）、期日はメールが `21 October 2025`、
//!   SMS が `21 Oct 2025`

use pgmanager_domain::notification::{
    EmailMessage,
    NotificationError,
    ReminderNotification,
    SmsMessage,
};
use tera::{Context, Tera};

const EMAIL_TEMPLATE: &str = "payment_reminder";
const SMS_TEMPLATE: &str = "payment_reminder_sms.txt";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// `include_str!` で埋め込んだテンプレートを tera に登録する
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "payment_reminder.html",
                    include_str!("../../../templates/notifications/payment_reminder.html"),
                ),
                (
                    "payment_reminder.txt",
                    include_str!("../../../templates/notifications/payment_reminder.txt"),
                ),
                (
                    SMS_TEMPLATE,
                    include_str!("../../../templates/notifications/payment_reminder_sms.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// リマインダーメールを生成する
    ///
    /// `year` はフッターの著作権表記に使う。
    pub fn render_email(
        &self,
        notification: &ReminderNotification,
        year: i32,
    ) -> Result<EmailMessage, NotificationError> {
        let to = notification
            .recipient_email
            .clone()
            .ok_or(NotificationError::MissingRecipient)?;

        let mut context = base_context(notification);
        context.insert("due_date", &notification.due_date.as_naive().format("%-d %B %Y").to_string());
        context.insert("year", &year);

        let html_body = self
            .engine
            .render(&format!("{EMAIL_TEMPLATE}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{EMAIL_TEMPLATE}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to,
            subject: email_subject(notification),
            html_body,
            text_body,
        })
    }

    /// リマインダー SMS を生成する
    pub fn render_sms(&self, notification: &ReminderNotification) -> Result<SmsMessage, NotificationError> {
        let to = notification
            .recipient_phone
            .clone()
            .ok_or(NotificationError::MissingRecipient)?;

        let mut context = base_context(notification);
        context.insert("due_date", &notification.due_date.as_naive().format("%-d %b %Y").to_string());

        let body = self
            .engine
            .render(SMS_TEMPLATE, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(SmsMessage {
            to,
            body: body.trim_end().to_string(),
        })
    }
}

fn base_context(notification: &ReminderNotification) -> Context {
    let mut context = Context::new();
    context.insert("tenant_name", &notification.tenant_name);
    context.insert("room_number", &notification.room_number);
    context.insert("amount", &notification.amount.to_indian_grouping());
    context.insert("is_overdue", &notification.is_overdue);
    context
}

fn email_subject(notification: &ReminderNotification) -> String {
    if notification.is_overdue {
        format!(
            "⚠️ OVERDUE: Rent Payment Reminder - Room {}",
            notification.room_number
        )
    } else {
        format!("🔔 Rent Payment Reminder - Room {}", notification.room_number)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pgmanager_domain::payment::{Amount, DueDate};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn make_notification(is_overdue: bool) -> ReminderNotification {
        ReminderNotification {
            recipient_email: Some("priya.patel@example.com".to_string()),
            recipient_phone: Some("+919876543211".to_string()),
            tenant_name: "Priya Patel".to_string(),
            amount: Amount::new(dec!(120000)).unwrap(),
            due_date: DueDate::new(NaiveDate::from_ymd_opt(2025, 10, 21).unwrap()),
            room_number: "102".to_string(),
            is_overdue,
        }
    }

    #[test]
    fn newが正常に初期化される() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn 期日前のメールは通常の件名と本文になる() {
        let renderer = TemplateRenderer::new().unwrap();

        let email = renderer.render_email(&make_notification(false), 2025).unwrap();

        assert_eq!(email.to, "priya.patel@example.com");
        assert_eq!(email.subject, "🔔 Rent Payment Reminder - Room 102");
        assert!(email.html_body.contains("UPCOMING PAYMENT"));
        assert!(email.html_body.contains("Priya Patel"));
        assert!(email.html_body.contains("₹1,20,000"));
        assert!(email.html_body.contains("21 October 2025"));
        assert!(email.html_body.contains("© 2025 PG Manager Pro"));
        assert!(!email.html_body.contains("OVERDUE PAYMENT"));
        assert!(email.text_body.contains("is due soon"));
        assert!(email.text_body.contains("₹1,20,000"));
    }

    #[test]
    fn 延滞のメールは警告の件名と本文になる() {
        let renderer = TemplateRenderer::new().unwrap();

        let email = renderer.render_email(&make_notification(true), 2025).unwrap();

        assert_eq!(email.subject, "⚠️ OVERDUE: Rent Payment Reminder - Room 102");
        assert!(email.html_body.contains("OVERDUE PAYMENT"));
        assert!(email.html_body.contains("This payment is overdue"));
        assert!(email.text_body.contains("[OVERDUE PAYMENT]"));
    }

    #[test]
    fn html本文では入居者名をエスケープする() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut notification = make_notification(false);
        notification.tenant_name = "<script>alert(1)</script>".to_string();

        let email = renderer.render_email(&notification, 2025).unwrap();

        assert!(!email.html_body.contains("<script>"));
        assert!(email.html_body.contains("&lt;script&gt;"));
    }

    #[test]
    fn メールアドレスが無ければmissing_recipient() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut notification = make_notification(false);
        notification.recipient_email = None;

        let result = renderer.render_email(&notification, 2025);

        assert_eq!(result, Err(NotificationError::MissingRecipient));
    }

    #[test]
    fn 期日前のsmsは通常のリマインダー文面になる() {
        let renderer = TemplateRenderer::new().unwrap();

        let sms = renderer.render_sms(&make_notification(false)).unwrap();

        assert_eq!(sms.to, "+919876543211");
        assert_eq!(
            sms.body,
            "🔔 RENT REMINDER\n\nDear Priya Patel,\n\nYour rent payment is due soon.\n\nRoom: 102\nAmount: ₹1,20,000\nDue Date: 21 Oct 2025\n\nPlease ensure timely payment.\n\n- PG Manager Pro"
        );
    }

    #[test]
    fn 延滞のsmsは警告文面になる() {
        let renderer = TemplateRenderer::new().unwrap();

        let sms = renderer.render_sms(&make_notification(true)).unwrap();

        assert!(sms.body.starts_with("⚠️ OVERDUE RENT ALERT"));
        assert!(sms.body.contains("Your rent payment for Room 102 is OVERDUE."));
        assert!(sms.body.ends_with("- PG Manager Pro"));
    }

    #[test]
    fn 電話番号が無ければmissing_recipient() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut notification = make_notification(true);
        notification.recipient_phone = None;

        assert_eq!(
            renderer.render_sms(&notification),
            Err(NotificationError::MissingRecipient)
        );
    }
}
