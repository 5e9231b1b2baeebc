//! # マーケットプレイス通知 共有ユーティリティ
//!
//! ワークスペース全体で使う横断的なユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - tracing-subscriber 等の重い依存は `observability` feature の背後に置く

pub mod event_log;
pub mod observability;

pub use observability::{LogFormat, TracingConfig};
