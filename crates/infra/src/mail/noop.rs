//! Noop メール送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ローカル実行や通知無効化時に使用する。

use async_trait::async_trait;
use marketplace_notifier_domain::notification::{MailError, OutboundNotification};

use super::MailSender;

/// Noop メール送信（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopMailSender;

#[async_trait]
impl MailSender for NoopMailSender {
    fn create_message(&self) -> OutboundNotification {
        OutboundNotification::default()
    }

    async fn send(&self, message: OutboundNotification) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            is_html = message.is_html,
            body_len = message.body.len(),
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
