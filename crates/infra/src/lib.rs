//! # マーケットプレイス通知 インフラ層
//!
//! ファイルシステムと SMTP サーバーへのアクセスを担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **テンプレート解決**: ファイル → 同梱リソース → 組み込みリテラルの順に本文テンプレートを探す
//! - **メール送信**: ドメイン層の送信メッセージを SMTP で配送する
//!
//! ## 依存関係
//!
//! ```text
//! app → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`mail`] - メール送信トレイトと SMTP / Noop 実装
//! - [`template_locator`] - テンプレート識別子の解決
//! - `mock` - テスト用モック（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use marketplace_notifier_infra::{TemplateLocator, mail::SmtpMailSender};
//!
//! let locator = TemplateLocator::new();
//! let template = locator.resolve(Some("/etc/odm/subscribe.mustache"))?;
//! let sender = SmtpMailSender::new("localhost", 1025, "noreply@example.com".to_string());
//! ```

pub mod mail;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod template_locator;

pub use mail::MailSender;
pub use template_locator::{TemplateLocator, TemplateSource};
