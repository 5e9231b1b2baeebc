//! 通知テストビルダー
//!
//! 標準的な申請データとモック送信手段のセットアップを提供する。

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use marketplace_notifier_domain::marketplace::{
    MarketplaceRequest,
    Provider,
    RequestDetails,
    Requester,
};
use marketplace_notifier_infra::{TemplateLocator, mock::MockMailSender};

use crate::{
    config::EmailConfig,
    usecase::notification::{NotificationService, TemplateRenderer},
};

/// 通知テストのセットアップデータ
///
/// SUT と、送信内容を検証するためのモック送信手段のセット。
pub struct NotificationTestSetup {
    pub sut:    NotificationService,
    pub sender: MockMailSender,
}

/// 通知テストビルダー
///
/// # 使用例
///
/// ```ignore
/// use marketplace_notifier::test_utils::NotificationTestBuilder;
///
/// #[tokio::test]
/// async fn test_example() {
///     let builder = NotificationTestBuilder::new();
///     let setup = builder.build_service();
///
///     setup.sut.send_access_email(&builder.request()).await.unwrap();
///
///     assert_eq!(setup.sender.sent_messages().len(), 1);
/// }
/// ```
pub struct NotificationTestBuilder {
    from_address:     String,
    requester:        String,
    data_product_fqn: String,
    start_date:       DateTime<Utc>,
    end_date:         DateTime<Utc>,
}

impl NotificationTestBuilder {
    pub fn new() -> Self {
        Self {
            from_address:     "noreply@example.com".to_string(),
            requester:        "user@example.com".to_string(),
            data_product_fqn: "test/product/1.0.0".to_string(),
            start_date:       Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            end_date:         Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap(),
        }
    }

    /// 既定値のメール設定（同梱テンプレートを使用）
    pub fn email_config(&self) -> EmailConfig {
        EmailConfig::new(&self.from_address)
    }

    /// 標準的な購読申請
    pub fn request(&self) -> MarketplaceRequest {
        MarketplaceRequest {
            operation: Some("MARKETPLACE_SUBSCRIBE".to_string()),
            v:         Some("1.0".to_string()),
            request:   Some(RequestDetails {
                name: Some("Test Request".to_string()),
                identifier: Some("test-request-123".to_string()),
                requester: Some(Requester {
                    kind:       Some("user".to_string()),
                    identifier: Some(self.requester.clone()),
                }),
                provider: Some(Provider {
                    data_product_fqn: Some(self.data_product_fqn.clone()),
                }),
                consumer: None,
                start_date: Some(self.start_date),
                end_date: Some(self.end_date),
            }),
        }
    }

    /// 既定のメール設定とモック送信手段で NotificationService を構築する
    pub fn build_service(&self) -> NotificationTestSetup {
        self.build_service_with(self.email_config())
    }

    /// 任意のメール設定で NotificationService を構築する
    pub fn build_service_with(&self, config: EmailConfig) -> NotificationTestSetup {
        let sender = MockMailSender::new();
        let sut = NotificationService::new(
            Arc::new(sender.clone()),
            TemplateLocator::new(),
            TemplateRenderer::new(),
            config,
        );
        NotificationTestSetup { sut, sender }
    }
}

impl Default for NotificationTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
