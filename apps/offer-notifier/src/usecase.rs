//! # ユースケース層
//!
//! Offer Notifier のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: ユーザーディレクトリとメール送信を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod offer_notification;

pub use offer_notification::{MailRenderer, NotifyOutcome, OfferNotificationService};
