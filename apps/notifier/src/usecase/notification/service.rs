//! # 通知サービス
//!
//! テンプレート解決 → レンダリング → メッセージ組み立て → 送信を統合するサービス。
//!
//! ## 設計方針
//!
//! - **1 呼び出し 1 通**: 成功時はトランスポートにちょうど 1 通渡す。組み立てに失敗した
//!   場合はトランスポートに触れない
//! - **単一の失敗型**: どの段の失敗も [`NotificationError::SendFailed`] に包んで返す
//! - **依存性注入**: `MailSender` は trait で抽象化し、設定は不変値として受け取る
//! - **リトライなし**: 再送が必要な呼び出し側は `compose_and_send` の外側で行う

use std::sync::Arc;

use marketplace_notifier_domain::{
    AccessEvent,
    MarketplaceRequest,
    NotificationError,
    OutboundNotification,
};
use marketplace_notifier_infra::{MailSender, TemplateLocator};
use marketplace_notifier_shared::{
    event_log::{error, event},
    log_business_event,
};

use super::template_renderer::{RenderContext, TemplateRenderer};
use crate::config::EmailConfig;

/// 通知サービス
///
/// 保持する値はすべて読み取り専用で、複数タスクから同時に呼び出してよい。
pub struct NotificationService {
    sender:   Arc<dyn MailSender>,
    locator:  TemplateLocator,
    renderer: TemplateRenderer,
    config:   EmailConfig,
}

impl NotificationService {
    pub fn new(
        sender: Arc<dyn MailSender>,
        locator: TemplateLocator,
        renderer: TemplateRenderer,
        config: EmailConfig,
    ) -> Self {
        Self {
            sender,
            locator,
            renderer,
            config,
        }
    }

    /// アクセス付与通知を送信する
    pub async fn send_access_email(
        &self,
        request: &MarketplaceRequest,
    ) -> Result<(), NotificationError> {
        self.compose_and_send(AccessEvent::Granted, request).await
    }

    /// アクセス取り消し通知を送信する
    pub async fn send_unsubscribe_email(
        &self,
        request: &MarketplaceRequest,
    ) -> Result<(), NotificationError> {
        self.compose_and_send(AccessEvent::Revoked, request).await
    }

    /// 通知メールを組み立てて送信する
    pub async fn compose_and_send(
        &self,
        event: AccessEvent,
        request: &MarketplaceRequest,
    ) -> Result<(), NotificationError> {
        let event_type: &str = event.into();
        let recipient = request.requester_address().unwrap_or_default();

        let outcome = match self.compose(event, request) {
            Ok(message) => self
                .sender
                .send(message)
                .await
                .map_err(NotificationError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::OUTBOUND_EMAIL,
                    event.result = event::result::SUCCESS,
                    notification.event_type = event_type,
                    notification.recipient = recipient,
                    "通知メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                let (error_category, error_kind) = error_context(&e);
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::OUTBOUND_EMAIL,
                    event.result = event::result::FAILURE,
                    notification.event_type = event_type,
                    notification.recipient = recipient,
                    error.category = error_category,
                    error.kind = error_kind,
                    error = %e,
                    "通知メール送信失敗"
                );
                Err(NotificationError::SendFailed {
                    event,
                    source: Box::new(e),
                })
            }
        }
    }

    /// 送信メッセージを組み立てる（送信はしない）
    pub fn compose(
        &self,
        event: AccessEvent,
        request: &MarketplaceRequest,
    ) -> Result<OutboundNotification, NotificationError> {
        let source = self.locator.resolve(self.config.template_for(event))?;
        let compiled = self
            .renderer
            .compile(source.text(), event.template_name())?;
        let body = self
            .renderer
            .execute(&compiled, &RenderContext::new(request))?;

        let to = request
            .requester_address()
            .ok_or(NotificationError::MissingField("request.requester.identifier"))?;
        let data_product_fqn = request
            .data_product_fqn()
            .ok_or(NotificationError::MissingField("request.provider.dataProductFqn"))?;

        let mut message = self.sender.create_message();
        message.from.clone_from(&self.config.from_address);
        message.to = to.to_string();
        message.subject = format!("{}{data_product_fqn}", event.subject_prefix());
        message.body = body;
        message.is_html = self.config.use_html;
        Ok(message)
    }
}

/// 失敗原因を `error.category` / `error.kind` の組に対応付ける
fn error_context(cause: &NotificationError) -> (&'static str, &'static str) {
    match cause {
        NotificationError::Transport(_) => {
            (error::category::EXTERNAL_SERVICE, error::kind::MAIL_TRANSPORT)
        }
        NotificationError::MissingField(_) => {
            (error::category::VALIDATION, error::kind::MISSING_FIELD)
        }
        NotificationError::InvalidArgument(_) => {
            (error::category::CONFIGURATION, error::kind::INVALID_ARGUMENT)
        }
        NotificationError::TemplateSyntax { .. } => {
            (error::category::CONFIGURATION, error::kind::TEMPLATE_SYNTAX)
        }
        NotificationError::TemplateFailed(_) => {
            (error::category::CONFIGURATION, error::kind::TEMPLATE_RENDER)
        }
        NotificationError::SendFailed { .. } => (
            error::category::INFRASTRUCTURE,
            error::kind::NOTIFICATION_COMPOSITION,
        ),
    }
}
