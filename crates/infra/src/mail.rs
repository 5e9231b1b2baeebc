//! # メール送信
//!
//! 通知メールの送信を担当するトランスポート層。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: [`MailSender`] で送信手段を抽象化し、通知サービスは実装を知らない
//! - **2 つの実装**: SMTP（lettre）、Noop（ログ出力のみ）。テストでは
//!   `test-utils` feature の `MockMailSender` を使う
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **タイムアウトはトランスポートの責務**: 通知サービス側では待ち時間を制御しない

mod noop;
mod smtp;

use async_trait::async_trait;
use marketplace_notifier_domain::notification::{MailError, OutboundNotification};
pub use noop::NoopMailSender;
pub use smtp::SmtpMailSender;

/// メール送信トレイト
#[async_trait]
pub trait MailSender: Send + Sync {
    /// 空の送信メッセージを作成する
    ///
    /// 実装が既定の送信元を持つ場合は `from` を埋めて返す。
    fn create_message(&self) -> OutboundNotification;

    /// メッセージを送信する
    async fn send(&self, message: OutboundNotification) -> Result<(), MailError>;

    /// プレーンテキストのメールを送信する
    async fn send_text(&self, to: &str, subject: &str, text: &str) -> Result<(), MailError> {
        let mut message = self.create_message();
        message.to = to.to_string();
        message.subject = subject.to_string();
        message.body = text.to_string();
        message.is_html = false;
        self.send(message).await
    }
}
