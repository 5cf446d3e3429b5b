//! # メール本文生成
//!
//! オファーとユーザーからプレーンテキストのメールを生成する。
//!
//! ## 設計方針
//!
//! - **テンプレートエンジンは使わない**: 本文は固定の段落構成を文字列整形で組み立てる
//! - **件名パターン**: `Nouvelle offre : {title}`
//! - **野菜一覧は任意**: 明細が空・未指定の場合は一覧セクション自体を出力しない

use veggiecart_domain::{
    notification::EmailMessage,
    offer::{Offer, VegetableLine},
    user::UserRecord,
};

/// 署名のデフォルト
const DEFAULT_SIGNATURE: &str = "— L’équipe VeggieCart 🌱";

/// 野菜一覧セクションの見出し
pub const VEGETABLE_SECTION_HEADING: &str = "Les légumes de la semaine :";

/// メール本文生成
#[derive(Debug, Clone)]
pub struct MailRenderer {
    signature: String,
}

impl MailRenderer {
    pub fn new() -> Self {
        Self::with_signature(DEFAULT_SIGNATURE)
    }

    pub fn with_signature(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }

    /// ユーザー宛てのメールを生成する
    ///
    /// 通知先メールアドレスが無いユーザーには `None` を返す。
    pub fn render(&self, offer: &Offer, user: &UserRecord) -> Option<EmailMessage> {
        let to = user.notification_address()?;

        Some(EmailMessage {
            to:        to.to_string(),
            subject:   Self::subject(offer),
            text_body: self.body(offer, user),
        })
    }

    /// 件名
    pub fn subject(offer: &Offer) -> String {
        format!("Nouvelle offre : {}", offer.title)
    }

    /// プレーンテキスト本文
    pub fn body(&self, offer: &Offer, user: &UserRecord) -> String {
        let mut body = format!(
            "Bonjour {},\n\n\
             Découvrez notre nouvelle offre de la semaine du {} au {} !\n\n\
             {}\n\n",
            user.display_name(),
            offer.start_date,
            offer.end_date,
            offer.description,
        );

        if let Some(lines) = offer.listed_vegetables() {
            body.push_str(VEGETABLE_SECTION_HEADING);
            body.push('\n');
            for line in lines {
                body.push_str(&Self::vegetable_line(line));
                body.push('\n');
            }
            body.push('\n');
        }

        body.push_str("À très bientôt !\n\n");
        body.push_str(&self.signature);
        body
    }

    /// 野菜明細 1 行
    ///
    /// 名前・価格・包装・標準数量の順に並べる。
    fn vegetable_line(line: &VegetableLine) -> String {
        format!(
            "- {} : {} | conditionnement : {} | quantité standard : {}",
            line.name,
            line.price_label(),
            line.packaging_label(),
            line.standard_quantity_label(),
        )
    }
}

impl Default for MailRenderer {
    fn default() -> Self {
        Self::new()
    }
}
