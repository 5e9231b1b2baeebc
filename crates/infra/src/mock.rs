//! # テスト用モック
//!
//! 通知サービスのテストで使用するインメモリのメール送信実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! marketplace-notifier-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use marketplace_notifier_domain::notification::{MailError, OutboundNotification};

use crate::mail::MailSender;

/// `send_text` で送られたメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleMailMessage {
    pub to:      String,
    pub subject: String,
    pub text:    String,
}

// ===== MockMailSender =====

/// 送信内容を記録するモック
///
/// `Clone` しても記録先は共有される。テストでは clone をサービスに渡し、
/// 手元のインスタンスで送信内容を検証する。
#[derive(Clone, Default)]
pub struct MockMailSender {
    sent_messages:        Arc<Mutex<Vec<OutboundNotification>>>,
    sent_simple_messages: Arc<Mutex<Vec<SimpleMailMessage>>>,
    failure:              Arc<Mutex<Option<String>>>,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に配送失敗を返すモックを作成する
    pub fn failing(reason: impl Into<String>) -> Self {
        let sender = Self::new();
        sender.fail_with(reason);
        sender
    }

    /// 以降の送信を配送失敗にする
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(reason.into());
    }

    /// `send` で送られたメッセージ
    pub fn sent_messages(&self) -> Vec<OutboundNotification> {
        self.sent_messages.lock().unwrap().clone()
    }

    /// `send_text` で送られたメッセージ
    pub fn sent_simple_messages(&self) -> Vec<SimpleMailMessage> {
        self.sent_simple_messages.lock().unwrap().clone()
    }

    /// 記録したメッセージをすべて消去する
    pub fn clear(&self) {
        self.sent_messages.lock().unwrap().clear();
        self.sent_simple_messages.lock().unwrap().clear();
    }

    fn check_failure(&self) -> Result<(), MailError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(reason) => Err(MailError::Delivery(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    fn create_message(&self) -> OutboundNotification {
        OutboundNotification::default()
    }

    async fn send(&self, message: OutboundNotification) -> Result<(), MailError> {
        self.check_failure()?;
        self.sent_messages.lock().unwrap().push(message);
        Ok(())
    }

    async fn send_text(&self, to: &str, subject: &str, text: &str) -> Result<(), MailError> {
        self.check_failure()?;
        self.sent_simple_messages
            .lock()
            .unwrap()
            .push(SimpleMailMessage {
                to:      to.to_string(),
                subject: subject.to_string(),
                text:    text.to_string(),
            });
        Ok(())
    }
}
