//! # メール送信
//!
//! オファー通知メールを 1 通ずつ送る。
//!
//! - [`SmtpNotificationSender`]: Gmail 等の SMTP リレー、または Mailpit
//! - [`NoopNotificationSender`]: 送らずにログへ出す（`MAIL_BACKEND=noop`）

mod smtp;

use async_trait::async_trait;
pub use smtp::{SmtpCredentials, SmtpNotificationSender};
use veggiecart_domain::notification::{EmailMessage, NotificationError};

/// メール送信トレイト
///
/// 1 通ごとに成功・失敗を返す。再送は行わない。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}

/// 送信しない実装
///
/// 宛先と件名は info、本文は debug で出力する。本文の確認用途に使える。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(to = %email.to, subject = %email.subject, "メール送信は無効のためスキップ");
        tracing::debug!(to = %email.to, body = %email.text_body, "スキップしたメールの本文");
        Ok(())
    }
}
