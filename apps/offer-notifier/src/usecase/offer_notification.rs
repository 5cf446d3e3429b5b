//! # オファー通知ユースケース
//!
//! 受信者の検索 → メール本文の生成 → 並行送信 → 結果の集約を行う。
//!
//! ## モジュール構成
//!
//! - [`mail_renderer`] - 件名・プレーンテキスト本文の生成
//! - [`service`] - 検証 + 検索 + 生成 + 送信の統合サービス

pub mod mail_renderer;
pub mod service;

pub use mail_renderer::MailRenderer;
pub use service::{NotifyOutcome, OfferNotificationService};
