//! # 通知サービス設定
//!
//! 環境変数から起動時に一度だけ設定を読み込む。読み込んだ設定は不変で、
//! 並行する送信処理から共有される。

use std::env;

use marketplace_notifier_domain::AccessEvent;
use marketplace_notifier_infra::template_locator::{
    DEFAULT_SUBSCRIBE_TEMPLATE,
    DEFAULT_UNSUBSCRIBE_TEMPLATE,
};
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MailBackend {
    /// SMTP サーバー経由で送信
    Smtp,
    /// 送信しない（ログ出力のみ）
    #[default]
    Noop,
}

/// 通知サービス全体の設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// 送信バックエンド
    pub backend:   MailBackend,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host: String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port: u16,
    /// メール本文・宛先に関する設定
    pub email:     EmailConfig,
}

/// 通知メールの設定
///
/// テンプレート識別子が `None` の場合、送信時に `InvalidArgument` で失敗する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    /// 送信元メールアドレス
    pub from_address:         String,
    /// アクセス付与通知のテンプレート識別子
    pub subscribe_template:   Option<String>,
    /// アクセス取り消し通知のテンプレート識別子
    pub unsubscribe_template: Option<String>,
    /// 本文を HTML として送るか
    pub use_html:             bool,
}

impl EmailConfig {
    /// 同梱テンプレートを使う設定を作成する
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address:         from_address.into(),
            subscribe_template:   Some(DEFAULT_SUBSCRIBE_TEMPLATE.to_string()),
            unsubscribe_template: Some(DEFAULT_UNSUBSCRIBE_TEMPLATE.to_string()),
            use_html:             false,
        }
    }

    /// イベントに対応するテンプレート識別子を返す
    pub fn template_for(&self, event: AccessEvent) -> Option<&str> {
        match event {
            AccessEvent::Granted => self.subscribe_template.as_deref(),
            AccessEvent::Revoked => self.unsubscribe_template.as_deref(),
        }
    }
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// | 変数名 | 必須 | デフォルト |
    /// |--------|------|-----------|
    /// | `ODM_EMAIL_FROM` | **Yes** | - |
    /// | `ODM_EMAIL_SUBSCRIBE_TEMPLATE_PATH` | No | 同梱の付与テンプレート |
    /// | `ODM_EMAIL_UNSUBSCRIBE_TEMPLATE_PATH` | No | 同梱の取り消しテンプレート |
    /// | `ODM_EMAIL_USE_HTML` | No | `false` |
    /// | `NOTIFICATION_BACKEND` | No | `noop` |
    /// | `SMTP_HOST` | No | `localhost` |
    /// | `SMTP_PORT` | No | `1025` |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let from_address = lookup("ODM_EMAIL_FROM")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("ODM_EMAIL_FROM"))?;

        let email = EmailConfig {
            subscribe_template: Some(
                lookup("ODM_EMAIL_SUBSCRIBE_TEMPLATE_PATH")
                    .unwrap_or_else(|| DEFAULT_SUBSCRIBE_TEMPLATE.to_string()),
            ),
            unsubscribe_template: Some(
                lookup("ODM_EMAIL_UNSUBSCRIBE_TEMPLATE_PATH")
                    .unwrap_or_else(|| DEFAULT_UNSUBSCRIBE_TEMPLATE.to_string()),
            ),
            use_html: parse_or(&lookup, "ODM_EMAIL_USE_HTML", false)?,
            ..EmailConfig::new(from_address)
        };

        Ok(Self {
            backend: parse_or(&lookup, "NOTIFICATION_BACKEND", MailBackend::default())?,
            smtp_host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port: parse_or(&lookup, "SMTP_PORT", 1025)?,
            email,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
