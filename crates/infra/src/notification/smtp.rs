//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//!
//! - **本番**: 認証付き STARTTLS リレー（Gmail 等）。送信元はアカウントのアドレス
//! - **開発**: TLS・認証なし（Mailpit 等のローカル SMTP サーバー）

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::{ExposeSecret, SecretString};
use veggiecart_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// SMTP 認証情報
///
/// 送信アカウント（送信元アドレスを兼ねる）とそのクレデンシャル。
/// 値の有無は検証しない。不足していれば最初の送信が失敗する。
#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub account:    String,
    pub credential: SecretString,
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// プロセスで 1 つ作成し、全ての送信で共有する。
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotificationSender {
    /// 認証付き STARTTLS リレーで送信するインスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "smtp.gmail.com"）
    /// - `port`: SMTP サーバーのポート番号（例: 587）
    /// - `credentials`: 送信アカウントとクレデンシャル
    pub fn starttls(
        host: &str,
        port: u16,
        credentials: SmtpCredentials,
    ) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotificationError::SendFailed(format!("SMTP リレー設定失敗: {e}")))?
            .port(port)
            .credentials(Credentials::new(
                credentials.account.clone(),
                credentials.credential.expose_secret().to_string(),
            ))
            .build();

        Ok(Self {
            transport,
            from_address: credentials.account,
        })
    }

    /// TLS・認証なしで送信するインスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    /// - `from_address`: 送信元メールアドレス
    pub fn plaintext(host: &str, port: u16, from_address: String) -> Self {
        // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.text_body.clone())
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
