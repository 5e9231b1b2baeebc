//! # 通知ユースケース
//!
//! マーケットプレイス申請の処理結果を申請者へメールで通知する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - handlebars テンプレートエンジンによる本文生成
//! - [`service`] - テンプレート解決 + レンダリング + 送信の統合サービス

pub mod service;
pub mod template_renderer;

pub use service::NotificationService;
pub use template_renderer::{CompiledTemplate, RenderContext, TemplateRenderer};
