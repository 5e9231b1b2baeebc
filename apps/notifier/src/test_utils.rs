//! テストユーティリティ

mod notification_test_builder;

pub use notification_test_builder::{NotificationTestBuilder, NotificationTestSetup};
