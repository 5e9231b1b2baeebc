//! # Marketplace Notifier
//!
//! マーケットプレイス申請 JSON を読み込み、申請者へアクセス通知メールを送る。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ODM_EMAIL_FROM` | **Yes** | 送信元メールアドレス |
//! | `ODM_EMAIL_SUBSCRIBE_TEMPLATE_PATH` | No | 付与通知テンプレート（デフォルト: 同梱） |
//! | `ODM_EMAIL_UNSUBSCRIBE_TEMPLATE_PATH` | No | 取り消し通知テンプレート（デフォルト: 同梱） |
//! | `ODM_EMAIL_USE_HTML` | No | 本文を HTML で送るか（デフォルト: `false`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` | No | SMTP ホスト（デフォルト: `localhost`） |
//! | `SMTP_PORT` | No | SMTP ポート（デフォルト: `1025`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 実行方法
//!
//! ```bash
//! # 開発環境（Mailpit に送信）
//! ODM_EMAIL_FROM=noreply@example.com NOTIFICATION_BACKEND=smtp \
//!   cargo run -p marketplace-notifier -- granted request.json
//! ```

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use marketplace_notifier::{
    config::{MailBackend, NotifierConfig},
    usecase::notification::{NotificationService, TemplateRenderer},
};
use marketplace_notifier_domain::{AccessEvent, MarketplaceRequest};
use marketplace_notifier_infra::{
    MailSender,
    TemplateLocator,
    mail::{NoopMailSender, SmtpMailSender},
};
use marketplace_notifier_shared::{TracingConfig, observability};

/// 通知するイベント
#[derive(Debug, Clone, Copy, ValueEnum)]
enum EventArg {
    /// アクセス付与
    Granted,
    /// アクセス取り消し
    Revoked,
}

impl From<EventArg> for AccessEvent {
    fn from(arg: EventArg) -> Self {
        match arg {
            EventArg::Granted => AccessEvent::Granted,
            EventArg::Revoked => AccessEvent::Revoked,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "データプロダクトのアクセス通知メールを送信する")]
struct Args {
    /// 通知するイベント
    #[arg(value_enum)]
    event: EventArg,

    /// マーケットプレイス申請 JSON ファイルのパス
    request: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    observability::init_tracing(&TracingConfig::from_env("marketplace-notifier"))
        .context("トレーシングの初期化に失敗しました")?;

    let args = Args::parse();

    // 設定読み込み
    let config = NotifierConfig::from_env().context("設定の読み込みに失敗しました")?;

    let sender: Arc<dyn MailSender> = match config.backend {
        MailBackend::Smtp => {
            tracing::info!(
                "SMTP で送信します: {}:{}",
                config.smtp_host,
                config.smtp_port
            );
            Arc::new(SmtpMailSender::new(
                &config.smtp_host,
                config.smtp_port,
                config.email.from_address.clone(),
            ))
        }
        MailBackend::Noop => {
            tracing::info!("Noop バックエンドのため、メールは送信されません");
            Arc::new(NoopMailSender)
        }
    };

    let raw = fs::read_to_string(&args.request)
        .with_context(|| format!("申請ファイルを読み込めません: {}", args.request.display()))?;
    let request: MarketplaceRequest = serde_json::from_str(&raw)
        .with_context(|| format!("申請 JSON の形式が不正です: {}", args.request.display()))?;

    let service = NotificationService::new(
        sender,
        TemplateLocator::new(),
        TemplateRenderer::new(),
        config.email,
    );

    let event = AccessEvent::from(args.event);
    service
        .compose_and_send(event, &request)
        .await
        .with_context(|| format!("{event} 通知を送信できませんでした"))?;

    Ok(())
}
