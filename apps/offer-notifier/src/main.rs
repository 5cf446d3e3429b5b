//! # Offer Notifier サーバー
//!
//! 週替わりオファーを受け取り、通知対象の顧客にメールで知らせる HTTP サービス。
//!
//! ```text
//! ┌──────────────┐  POST   ┌────────────────┐  Scan   ┌──────────────┐
//! │  スケジューラ │────────▶│ Offer Notifier │────────▶│   DynamoDB   │
//! └──────────────┘         └────────────────┘         │   (users)    │
//!                                  │                  └──────────────┘
//!                                  │ SMTP
//!                                  ▼
//!                          ┌──────────────┐
//!                          │  メールサーバー │
//!                          └──────────────┘
//! ```
//!
//! 環境変数は [`config`](veggiecart_offer_notifier::config) を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（DynamoDB Local + Mailpit）
//! DYNAMODB_ENDPOINT=http://localhost:8000 SMTP_HOST=localhost SMTP_PORT=1025 SMTP_TLS=false \
//!   MAIL_ACCOUNT=offres@veggiecart.example.com cargo run -p veggiecart-offer-notifier
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use secrecy::SecretString;
use tokio::net::TcpListener;
use veggiecart_infra::{
    dynamodb,
    notification::{
        NoopNotificationSender,
        NotificationSender,
        SmtpCredentials,
        SmtpNotificationSender,
    },
    repository::DynamoDbUserDirectory,
};
use veggiecart_offer_notifier::{
    build_app,
    config::{MailBackend, MailConfig, NotifierConfig},
    handler::OfferState,
    usecase::{MailRenderer, OfferNotificationService},
};
use veggiecart_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("offer-notifier"));

    let config = NotifierConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Offer Notifier サーバーを起動します: {}:{}",
        config.host,
        config.port
    );
    // 値そのものは出力しない
    tracing::info!(
        mail.account_configured = config.mail.account.is_some(),
        mail.credential_configured = config.mail.credential.is_some(),
        "メール送信アカウントの設定状況"
    );

    let client = dynamodb::create_client(config.dynamodb_endpoint.as_deref()).await;
    let mut directory = DynamoDbUserDirectory::new(client, config.users_table.clone());
    if let Some(page_size) = config.users_scan_page_size {
        directory = directory.with_page_size(page_size);
    }
    let sender = build_sender(&config.mail)?;

    let service = OfferNotificationService::new(
        Arc::new(directory),
        sender,
        MailRenderer::new(),
        config.recipient_filter.clone(),
    );
    let app = build_app(Arc::new(OfferState { service }));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Offer Notifier サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 設定に応じたメール送信実装を作成する
fn build_sender(mail: &MailConfig) -> anyhow::Result<Arc<dyn NotificationSender>> {
    let account = mail.account.clone().unwrap_or_default();

    let sender: Arc<dyn NotificationSender> = match (mail.backend, mail.smtp_tls) {
        (MailBackend::Noop, _) => {
            tracing::info!("メール送信は無効です（noop）");
            Arc::new(NoopNotificationSender)
        }
        (MailBackend::Smtp, true) => {
            let credentials = SmtpCredentials {
                account,
                credential: mail
                    .credential
                    .clone()
                    .unwrap_or_else(|| SecretString::from(String::new())),
            };
            Arc::new(
                SmtpNotificationSender::starttls(&mail.smtp_host, mail.smtp_port, credentials)
                    .context("SMTP トランスポートの作成に失敗しました")?,
            )
        }
        (MailBackend::Smtp, false) => Arc::new(SmtpNotificationSender::plaintext(
            &mail.smtp_host,
            mail.smtp_port,
            account,
        )),
    };

    Ok(sender)
}
