//! # ユースケース層
//!
//! ## 設計方針
//!
//! - **依存性注入**: 送信手段を `Arc<dyn MailSender>` で外部から注入
//! - **薄いエントリポイント**: `main.rs` は設定と配線のみを行い、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - `notification`: アクセス通知メールの生成・送信

pub mod notification;

pub use notification::NotificationService;
