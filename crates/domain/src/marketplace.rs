//! # マーケットプレイス申請
//!
//! マーケットプレイスから受け取るアクセス申請のリソースモデル。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`MarketplaceRequest`] | マーケットプレイス申請 | 操作種別と申請詳細のエンベロープ |
//! | [`RequestDetails`] | 申請詳細 | 申請者、提供者、利用期間 |
//! | [`Requester`] | 申請者 | 通知メールの宛先 |
//! | [`Provider`] | 提供者 | 対象データプロダクト |
//!
//! ## 設計方針
//!
//! - **camelCase シリアライズ**: 既存のテンプレート（`{{data.request.provider.dataProductFqn}}`
//!   等）がそのまま動くよう、JSON のフィールド名をマーケットプレイス API に合わせる
//! - **全フィールド Option**: 欠けたフィールドはテンプレート上で空文字になる。
//!   エラーにするかどうかは通知サービスが判断する

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// マーケットプレイス申請
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceRequest {
    /// 操作種別（例: `MARKETPLACE_SUBSCRIBE`）
    #[serde(default)]
    pub operation: Option<String>,
    /// リソースのバージョン
    #[serde(default)]
    pub v:         Option<String>,
    /// 申請詳細
    #[serde(default)]
    pub request:   Option<RequestDetails>,
}

/// 申請詳細
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    #[serde(default)]
    pub name:       Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub requester:  Option<Requester>,
    #[serde(default)]
    pub provider:   Option<Provider>,
    /// 利用者（申請者と異なる場合のみ設定される）
    #[serde(default)]
    pub consumer:   Option<Consumer>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date:   Option<DateTime<Utc>>,
}

/// 申請者
///
/// `identifier` はメールアドレスとして扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    #[serde(rename = "type", default)]
    pub kind:       Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// データプロダクトの提供者
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// データプロダクトの完全修飾名（例: `test/product/1.0.0`）
    #[serde(default)]
    pub data_product_fqn: Option<String>,
}

/// データプロダクトの利用者
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumer {
    #[serde(rename = "type", default)]
    pub kind:       Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

impl MarketplaceRequest {
    /// 申請者のメールアドレスを返す
    pub fn requester_address(&self) -> Option<&str> {
        self.request
            .as_ref()?
            .requester
            .as_ref()?
            .identifier
            .as_deref()
    }

    /// 対象データプロダクトの FQN を返す
    pub fn data_product_fqn(&self) -> Option<&str> {
        self.request
            .as_ref()?
            .provider
            .as_ref()?
            .data_product_fqn
            .as_deref()
    }
}
