//! # 通知
//!
//! メール通知のメッセージ型と送信エラーを定義する。
//!
//! メール本文の生成は offer-notifier アプリ側（`MailRenderer`）、送信は infra 層
//! （`NotificationSender`）が担当し、このモジュールは両者の受け渡しに使う型のみを持つ。

use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// メールメッセージ
///
/// 本文生成の出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// プレーンテキスト本文
    pub text_body: String,
}
