//! # Marketplace Notifier ライブラリ
//!
//! データプロダクトのアクセス付与・取り消し時に申請者へ送るメール通知を組み立て、送信する。
//! バイナリ（`main.rs`）と結合テストの両方から利用する。

pub mod config;
pub mod usecase;

// テストユーティリティ（内部実装、ドキュメントからは隠す）
#[doc(hidden)]
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
