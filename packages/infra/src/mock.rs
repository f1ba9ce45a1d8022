//! # テスト用モック
//!
//! ユースケーステストで使用する送信記録付きモックと、失敗させられるリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! pgmanager-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
   sync::{Arc, Mutex},
   time::Duration,
};

use async_trait::async_trait;
use pgmanager_domain::{
   notification::{EmailMessage, NotificationError, SmsMessage},
   payment::Payment,
};

use crate::{
   error::InfraError,
   notification::EmailSender,
   repository::PaymentRepository,
   sms::SmsSender,
};

/// 送信を失敗させるかどうかと、応答までの遅延
#[derive(Clone, Default)]
struct Behavior {
   failure: Option<String>,
   delay:   Option<Duration>,
}

impl Behavior {
   async fn respond(&self, message_id: String) -> Result<String, NotificationError> {
      if let Some(delay) = self.delay {
         tokio::time::sleep(delay).await;
      }
      match &self.failure {
         Some(reason) => Err(NotificationError::SendFailed(reason.clone())),
         None => Ok(message_id),
      }
   }
}

// ===== MockEmailSender =====

#[derive(Clone, Default)]
pub struct MockEmailSender {
   sent:     Arc<Mutex<Vec<EmailMessage>>>,
   behavior: Behavior,
}

impl MockEmailSender {
   pub fn new() -> Self {
      Self::default()
   }

   /// 送信のたびに `SendFailed(reason)` を返す
   pub fn failing(reason: impl Into<String>) -> Self {
      Self {
         behavior: Behavior {
            failure: Some(reason.into()),
            delay:   None,
         },
         ..Self::default()
      }
   }

   /// 応答を `delay` だけ遅らせる
   pub fn with_delay(mut self, delay: Duration) -> Self {
      self.behavior.delay = Some(delay);
      self
   }

   /// 送信を試みたメール（失敗したものも含む）
   pub fn sent_emails(&self) -> Vec<EmailMessage> {
      self.sent.lock().unwrap().clone()
   }
}

#[async_trait]
impl EmailSender for MockEmailSender {
   async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError> {
      let count = {
         let mut sent = self.sent.lock().unwrap();
         sent.push(email.clone());
         sent.len()
      };
      self.behavior.respond(format!("<mock-{count}@pgmanager>")).await
   }
}

// ===== MockSmsSender =====

#[derive(Clone, Default)]
pub struct MockSmsSender {
   sent:     Arc<Mutex<Vec<SmsMessage>>>,
   behavior: Behavior,
}

impl MockSmsSender {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn failing(reason: impl Into<String>) -> Self {
      Self {
         behavior: Behavior {
            failure: Some(reason.into()),
            delay:   None,
         },
         ..Self::default()
      }
   }

   pub fn with_delay(mut self, delay: Duration) -> Self {
      self.behavior.delay = Some(delay);
      self
   }

   pub fn sent_messages(&self) -> Vec<SmsMessage> {
      self.sent.lock().unwrap().clone()
   }
}

#[async_trait]
impl SmsSender for MockSmsSender {
   async fn send_sms(&self, sms: &SmsMessage) -> Result<String, NotificationError> {
      let count = {
         let mut sent = self.sent.lock().unwrap();
         sent.push(sms.clone());
         sent.len()
      };
      self.behavior.respond(format!("SMmock{count}")).await
   }
}

// ===== MockPaymentRepository =====

/// 読み込み回数を記録し、失敗させることもできる PaymentRepository
#[derive(Clone, Default)]
pub struct MockPaymentRepository {
   payments: Arc<Mutex<Vec<Payment>>>,
   failure:  Option<String>,
   calls:    Arc<Mutex<usize>>,
}

impl MockPaymentRepository {
   pub fn new(payments: Vec<Payment>) -> Self {
      Self {
         payments: Arc::new(Mutex::new(payments)),
         ..Self::default()
      }
   }

   /// `find_all` が常に `InfraError::unexpected(reason)` を返す
   pub fn failing(reason: impl Into<String>) -> Self {
      Self {
         failure: Some(reason.into()),
         ..Self::default()
      }
   }

   pub fn find_all_calls(&self) -> usize {
      *self.calls.lock().unwrap()
   }
}

#[async_trait]
impl PaymentRepository for MockPaymentRepository {
   async fn find_all(&self) -> Result<Vec<Payment>, InfraError> {
      *self.calls.lock().unwrap() += 1;
      match &self.failure {
         Some(reason) => Err(InfraError::unexpected(reason.clone())),
         None => Ok(self.payments.lock().unwrap().clone()),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn email() -> EmailMessage {
      EmailMessage {
         to:        "priya.patel@example.com".to_string(),
         subject:   "⚠️ OVERDUE: Rent Payment Reminder - Room 102".to_string(),
         html_body: String::new(),
         text_body: String::new(),
      }
   }

   #[tokio::test]
   async fn mock_email_senderは送信内容を記録する() {
      let sender = MockEmailSender::new();

      let message_id = sender.send_email(&email()).await.unwrap();

      assert_eq!(message_id, "<mock-1@pgmanager>");
      assert_eq!(sender.sent_emails(), vec![email()]);
   }

   #[tokio::test]
   async fn failingのモックは失敗しても送信内容を記録する() {
      let sender = MockSmsSender::failing("network down");
      let sms = SmsMessage {
         to:   "+919876543211".to_string(),
         body: "⚠️ OVERDUE RENT ALERT".to_string(),
      };

      let result = sender.send_sms(&sms).await;

      assert_eq!(
         result,
         Err(NotificationError::SendFailed("network down".to_string()))
      );
      assert_eq!(sender.sent_messages().len(), 1);
   }

   #[tokio::test]
   async fn failingのリポジトリはunexpectedを返す() {
      let repo = MockPaymentRepository::failing("db down");

      let result = repo.find_all().await;

      assert!(result.is_err());
      assert_eq!(repo.find_all_calls(), 1);
   }
}
