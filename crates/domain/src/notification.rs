//! # 通知
//!
//! アクセス申請の状態遷移に伴うメール通知のドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`AccessEvent`] | 通知イベント種別 | 付与（Granted）、取り消し（Revoked） |
//! | [`OutboundNotification`] | 送信メッセージ | 送信元・宛先・件名・本文の組 |
//! | [`NotificationError`] | 通知エラー | 送信 1 回分の失敗を表す |
//!
//! ## 設計方針
//!
//! - **送信メッセージは使い捨て**: 1 回の送信で作られ、トランスポートに move される
//! - **単一の失敗型**: 通知サービスは下位のエラーを [`NotificationError::SendFailed`]
//!   に包んで返す。I/O やトランスポート固有のエラー型は外に漏らさない

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

/// 通知イベント種別
///
/// snake_case でシリアライズされる（`granted` / `revoked`）。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessEvent {
    /// アクセス付与: 申請が承認され利用可能になった
    Granted,
    /// アクセス取り消し: 購読解除により利用できなくなった
    Revoked,
}

impl AccessEvent {
    /// 件名の接頭辞を返す（後ろにデータプロダクト FQN が続く）
    pub fn subject_prefix(self) -> &'static str {
        match self {
            Self::Granted => "Access Granted: ",
            Self::Revoked => "Unsubscription Confirmed: ",
        }
    }

    /// テンプレートのコンパイル時に使う名前を返す
    pub fn template_name(self) -> &'static str {
        match self {
            Self::Granted => "subscribe-email-template",
            Self::Revoked => "unsubscribe-email-template",
        }
    }
}

/// 送信メッセージ
///
/// 通知サービスが組み立て、infra 層の `MailSender` に渡す。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundNotification {
    /// 送信元メールアドレス
    pub from:    String,
    /// 送信先メールアドレス
    pub to:      String,
    /// 件名
    pub subject: String,
    /// 本文
    pub body:    String,
    /// 本文を HTML として送るか
    pub is_html: bool,
}

/// メール送信エラー
///
/// トランスポート実装（SMTP 等）で発生したエラーを文字列化して保持する。
#[derive(Debug, Error)]
pub enum MailError {
    /// メールアドレスの形式が不正
    #[error("メールアドレスが不正です: {0}")]
    InvalidAddress(String),

    /// メッセージの構築に失敗
    #[error("メッセージ構築に失敗: {0}")]
    Build(String),

    /// 配送に失敗
    #[error("配送に失敗: {0}")]
    Delivery(String),
}

/// 通知エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 必須の入力が欠けている（テンプレート識別子が未設定など）
    #[error("不正な引数: {0}")]
    InvalidArgument(String),

    /// テンプレートの構文エラー
    #[error("テンプレート構文エラー（{template}）: {message}")]
    TemplateSyntax { template: String, message: String },

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// 申請データに必須フィールドがない
    #[error("必須フィールドがありません: {0}")]
    MissingField(&'static str),

    /// トランスポートでの送信に失敗
    #[error("メール送信に失敗: {0}")]
    Transport(#[from] MailError),

    /// 通知 1 件の送信失敗
    ///
    /// 通知サービスが返す唯一のエラー。原因は `source` に保持する。
    #[error("{event} 通知の送信に失敗: {source}")]
    SendFailed {
        event:  AccessEvent,
        #[source]
        source: Box<NotificationError>,
    },
}

impl NotificationError {
    /// `SendFailed` の場合、原因となったエラーを返す
    pub fn cause(&self) -> Option<&NotificationError> {
        match self {
            Self::SendFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
