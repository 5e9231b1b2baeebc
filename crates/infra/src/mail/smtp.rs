//! SMTP メール送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
};
use marketplace_notifier_domain::notification::{MailError, OutboundNotification};

use super::MailSender;

/// SMTP メール送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpMailSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    /// - `from_address`: `create_message` が埋める既定の送信元
    pub fn new(host: &str, port: u16, from_address: String) -> Self {
        // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }

    /// 送信メッセージを lettre のメッセージに変換する
    fn build_message(message: OutboundNotification) -> Result<Message, MailError> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("送信元 {:?}: {e}", message.from)))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("宛先 {:?}: {e}", message.to)))?;
        let content_type = if message.is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject)
            .header(content_type)
            .body(message.body)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    fn create_message(&self) -> OutboundNotification {
        OutboundNotification {
            from: self.from_address.clone(),
            ..Default::default()
        }
    }

    async fn send(&self, message: OutboundNotification) -> Result<(), MailError> {
        let message = Self::build_message(message)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Delivery(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message() -> OutboundNotification {
        OutboundNotification {
            from:    "noreply@example.com".to_string(),
            to:      "user@example.com".to_string(),
            subject: "Access Granted: test/product/1.0.0".to_string(),
            body:    "本文".to_string(),
            is_html: false,
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailSender>();
    }

    #[tokio::test]
    async fn create_messageは既定の送信元を埋める() {
        let sender = SmtpMailSender::new("localhost", 1025, "noreply@example.com".to_string());

        let message = sender.create_message();

        assert_eq!(message.from, "noreply@example.com");
        assert!(message.to.is_empty());
        assert!(!message.is_html);
    }

    #[test]
    fn build_messageは宛先と件名を設定する() {
        let email = SmtpMailSender::build_message(make_message()).unwrap();

        let formatted = String::from_utf8(email.formatted()).unwrap();
        assert!(formatted.contains("To: user@example.com"));
        assert!(formatted.contains("Subject: Access Granted: test/product/1.0.0"));
        assert!(formatted.contains("Content-Type: text/plain"));
    }

    #[test]
    fn is_htmlの場合content_typeがtext_htmlになる() {
        let message = OutboundNotification {
            is_html: true,
            ..make_message()
        };

        let email = SmtpMailSender::build_message(message).unwrap();

        let formatted = String::from_utf8(email.formatted()).unwrap();
        assert!(formatted.contains("Content-Type: text/html"));
    }

    #[test]
    fn 宛先が不正な場合invalid_addressを返す() {
        let message = OutboundNotification {
            to: "not-an-address".to_string(),
            ..make_message()
        };

        let result = SmtpMailSender::build_message(message);

        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn 送信元が空の場合は接続前にinvalid_addressを返す() {
        let sender = SmtpMailSender::new("localhost", 1025, String::new());
        let message = OutboundNotification {
            to: "user@example.com".to_string(),
            ..sender.create_message()
        };

        let result = sender.send(message).await;

        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }
}
