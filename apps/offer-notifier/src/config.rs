//! # Offer Notifier 設定
//!
//! 環境変数から Offer Notifier サーバーの設定を読み込む。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `NOTIFIER_HOST` | `0.0.0.0` | バインドアドレス |
//! | `NOTIFIER_PORT` | `3000` | ポート番号 |
//! | `DYNAMODB_ENDPOINT` | なし | DynamoDB Local のエンドポイント（未設定で AWS デフォルト） |
//! | `USERS_TABLE` | `users` | ユーザーディレクトリのテーブル名 |
//! | `USERS_SCAN_PAGE_SIZE` | なし | 1 回の Scan で評価するアイテム数の上限 |
//! | `RECIPIENT_PROFILE` | `customer` | 通知対象のプロフィール |
//! | `RECIPIENT_REQUIRE_ACTIVE` | `true` | `isActive == true` を条件に含めるか |
//! | `MAIL_BACKEND` | `smtp` | `smtp` または `noop` |
//! | `SMTP_HOST` | `smtp.gmail.com` | SMTP ホスト |
//! | `SMTP_PORT` | `587` | SMTP ポート |
//! | `SMTP_TLS` | `true` | `false` で TLS・認証なし（Mailpit 等） |
//! | `MAIL_ACCOUNT` | なし | 送信アカウント（送信元アドレスを兼ねる） |
//! | `MAIL_CREDENTIAL` | なし | 送信アカウントのクレデンシャル |

use std::env;

use anyhow::{Context, bail};
use secrecy::SecretString;
use veggiecart_domain::user::RecipientFilter;

/// Offer Notifier サーバーの設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// DynamoDB エンドポイント（DynamoDB Local 使用時に設定）
    pub dynamodb_endpoint: Option<String>,
    /// ユーザーディレクトリのテーブル名
    pub users_table: String,
    /// ユーザーディレクトリの Scan ページサイズ（未設定で DynamoDB の既定）
    pub users_scan_page_size: Option<i32>,
    /// 通知対象の絞り込み条件
    pub recipient_filter: RecipientFilter,
    /// メール送信設定
    pub mail: MailConfig,
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    Smtp,
    Noop,
}

/// メール送信の設定
///
/// アカウントとクレデンシャルは未設定でも起動できる。
/// 不足していれば最初の送信が失敗する。
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend:    MailBackend,
    pub smtp_host:  String,
    pub smtp_port:  u16,
    /// STARTTLS と認証を使うか
    pub smtp_tls:   bool,
    pub account:    Option<String>,
    pub credential: Option<SecretString>,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let recipient_filter = RecipientFilter::new(
            lookup("RECIPIENT_PROFILE")
                .unwrap_or_else(|| RecipientFilter::CUSTOMER_PROFILE.to_string()),
            parse_bool(&lookup, "RECIPIENT_REQUIRE_ACTIVE", true)?,
        );

        Ok(Self {
            host: lookup("NOTIFIER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_port(&lookup, "NOTIFIER_PORT", 3000)?,
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.is_empty()),
            users_table: lookup("USERS_TABLE").unwrap_or_else(|| "users".to_string()),
            users_scan_page_size: parse_page_size(&lookup, "USERS_SCAN_PAGE_SIZE")?,
            recipient_filter,
            mail: MailConfig::from_lookup(&lookup)?,
        })
    }
}

impl MailConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let backend = match lookup("MAIL_BACKEND").as_deref() {
            None | Some("smtp") => MailBackend::Smtp,
            Some("noop") => MailBackend::Noop,
            Some(other) => bail!("MAIL_BACKEND は smtp または noop である必要があります: {other}"),
        };

        Ok(Self {
            backend,
            smtp_host: lookup("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            smtp_port: parse_port(lookup, "SMTP_PORT", 587)?,
            smtp_tls: parse_bool(lookup, "SMTP_TLS", true)?,
            account: lookup("MAIL_ACCOUNT").filter(|v| !v.is_empty()),
            credential: lookup("MAIL_CREDENTIAL")
                .filter(|v| !v.is_empty())
                .map(SecretString::from),
        })
    }
}

fn parse_port(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u16,
) -> anyhow::Result<u16> {
    match lookup(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} は有効なポート番号である必要があります: {value}")),
        None => Ok(default),
    }
}

fn parse_page_size(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<i32>> {
    let Some(value) = lookup(key).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match value.parse::<i32>() {
        Ok(size) if size > 0 => Ok(Some(size)),
        _ => bail!("{key} は正の整数である必要があります: {value}"),
    }
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> anyhow::Result<bool> {
    match lookup(key).as_deref() {
        None => Ok(default),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => bail!("{key} は true または false である必要があります: {other}"),
    }
}
