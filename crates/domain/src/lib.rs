//! # マーケットプレイス通知ドメイン層
//!
//! データプロダクトのアクセス申請が状態遷移（付与 / 取り消し）したときに
//! 送信するメール通知のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - インフラ（SMTP、ファイルシステム）には一切依存しない
//! - 申請データは不透明な値としてテンプレートに渡す。ドメイン層が解釈するのは
//!   宛先アドレスとデータプロダクト FQN のみ
//! - エラーは thiserror による列挙型で表現する
//!
//! ## 依存関係の方向
//!
//! ```text
//! app → infra → domain
//!   ↘ shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`marketplace`] - マーケットプレイス申請のリソースモデル
//! - [`notification`] - 通知イベント、送信メッセージ、通知エラー
//!
//! ## 使用例
//!
//! ```rust
//! use marketplace_notifier_domain::notification::AccessEvent;
//!
//! let event: AccessEvent = "granted".parse().unwrap();
//! assert_eq!(event.subject_prefix(), "Access Granted: ");
//! ```

pub mod marketplace;
pub mod notification;

pub use marketplace::MarketplaceRequest;
pub use notification::{AccessEvent, MailError, NotificationError, OutboundNotification};
