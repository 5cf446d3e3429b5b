//! # オファー通知サービス
//!
//! 入力検証 → 受信者検索 → メール生成 → 並行送信 を統合するサービス。
//!
//! ## 設計方針
//!
//! - **副作用の前に検証**: オファーが無ければ検索も送信も行わない
//! - **全件待ち合わせ**: 送信は全て同時に開始し、全ての完了を待ってから結果を返す
//! - **一括失敗**: 1 件でも送信に失敗したら呼び出し全体を失敗とする。
//!   送信済みのメールは取り消さない。再送もしない
//! - **依存性注入**: `UserDirectory` と `NotificationSender` は trait で抽象化

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use veggiecart_domain::{
    notification::{EmailMessage, NotificationError},
    offer::Offer,
    user::RecipientFilter,
};
use veggiecart_infra::{notification::NotificationSender, repository::UserDirectory};
use veggiecart_shared::{event_log::event, log_business_event};

use super::MailRenderer;
use crate::error::NotifierError;

/// 通知対象がいない場合のメッセージ
pub const NO_RECIPIENTS_MESSAGE: &str = "Aucun utilisateur à notifier.";

/// 通知結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotifyOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NotifyOutcome {
    /// 全ての送信に成功した
    pub fn sent() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// 通知対象のユーザーがいなかった
    pub fn no_recipients() -> Self {
        Self {
            success: true,
            message: Some(NO_RECIPIENTS_MESSAGE.to_string()),
        }
    }
}

/// オファー通知サービス
///
/// プロセスで 1 つ作成し、呼び出しをまたいで共有する。
/// 呼び出しごとの可変状態は持たない。
pub struct OfferNotificationService {
    directory: Arc<dyn UserDirectory>,
    sender:    Arc<dyn NotificationSender>,
    renderer:  MailRenderer,
    filter:    RecipientFilter,
}

impl OfferNotificationService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        sender: Arc<dyn NotificationSender>,
        renderer: MailRenderer,
        filter: RecipientFilter,
    ) -> Self {
        Self {
            directory,
            sender,
            renderer,
            filter,
        }
    }

    /// 週替わりオファーを通知する
    ///
    /// # エラー
    ///
    /// - `InputMissing`: オファーが指定されていない（検索・送信は行わない）
    /// - `DirectoryQueryFailure`: ユーザーディレクトリの検索に失敗
    /// - `DispatchFailure`: 1 件以上のメール送信に失敗
    #[tracing::instrument(skip_all, fields(profile = %self.filter.profile))]
    pub async fn notify(&self, offer: Option<Offer>) -> Result<NotifyOutcome, NotifierError> {
        let Some(offer) = offer else {
            tracing::error!("オファーが指定されていません");
            return Err(NotifierError::InputMissing);
        };

        tracing::info!(title = %offer.title, "オファーを受信");

        let users = self
            .directory
            .find_recipients(&self.filter)
            .await
            .map_err(NotifierError::DirectoryQueryFailure)?;

        tracing::info!(count = users.len(), "通知対象のユーザー数");

        if users.is_empty() {
            tracing::info!("通知対象のユーザーがいません");
            return Ok(NotifyOutcome::no_recipients());
        }

        let mut emails = Vec::with_capacity(users.len());
        for user in &users {
            match self.renderer.render(&offer, user) {
                Some(email) => emails.push(email),
                None => tracing::debug!(
                    given_name = %user.given_name,
                    "メールアドレスが無いためスキップ"
                ),
            }
        }

        self.dispatch(&emails).await?;

        tracing::info!(sent = emails.len(), "全てのメールを送信しました");
        Ok(NotifyOutcome::sent())
    }

    /// 全てのメールを同時に送信し、全ての完了を待つ
    ///
    /// 失敗があれば宛先順で最初のエラーを返す。
    async fn dispatch(&self, emails: &[EmailMessage]) -> Result<(), NotifierError> {
        let results = join_all(emails.iter().map(|email| self.send_one(email))).await;

        match results.into_iter().find_map(Result::err) {
            Some(error) => Err(NotifierError::DispatchFailure(error)),
            None => Ok(()),
        }
    }

    async fn send_one(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let result = self.sender.send_email(email).await;

        match &result {
            Ok(()) => log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::OFFER_NOTIFICATION_SENT,
                event.entity_type = event::entity_type::USER,
                event.result = event::result::SUCCESS,
                notification.recipient = %email.to,
                "オファー通知メール送信成功"
            ),
            Err(e) => log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::OFFER_NOTIFICATION_FAILED,
                event.entity_type = event::entity_type::USER,
                event.result = event::result::FAILURE,
                notification.recipient = %email.to,
                error = %e,
                "オファー通知メール送信失敗"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use veggiecart_domain::{offer::VegetableLine, user::UserRecord};
    use veggiecart_infra::mock::{MockNotificationSender, MockUserDirectory};

    use super::*;

    fn make_service(
        directory: MockUserDirectory,
        sender: MockNotificationSender,
    ) -> OfferNotificationService {
        OfferNotificationService::new(
            Arc::new(directory),
            Arc::new(sender),
            MailRenderer::new(),
            RecipientFilter::active_customers(),
        )
    }

    fn make_offer() -> Offer {
        Offer {
            title:       "Semaine verte".to_string(),
            description: "Des légumes frais.".to_string(),
            start_date:  "2024-05-06".to_string(),
            end_date:    "2024-05-12".to_string(),
            vegetables:  Some(vec![VegetableLine {
                name:              "Carrot".to_string(),
                price:             Some(1.5),
                packaging:         Some("bag".to_string()),
                standard_quantity: Some(2.0),
            }]),
        }
    }

    fn customer(given_name: &str, email: Option<&str>) -> UserRecord {
        UserRecord {
            email: email.map(str::to_string),
            given_name: given_name.to_string(),
            name: None,
            push_notifications: true,
            profile: "customer".to_string(),
            is_active: Some(true),
        }
    }

    #[tokio::test]
    async fn オファーが無い場合は検索も送信もせずinput_missingを返す() {
        let directory = MockUserDirectory::new();
        directory.add_user(customer("Marie", Some("marie@example.com")));
        let sender = MockNotificationSender::new();
        let service = make_service(directory.clone(), sender.clone());

        let result = service.notify(None).await;

        assert!(matches!(result, Err(NotifierError::InputMissing)));
        assert_eq!(directory.query_count(), 0);
        assert!(sender.attempts().is_empty());
    }

    #[tokio::test]
    async fn 通知対象がいない場合はメッセージ付きで成功する() {
        let directory = MockUserDirectory::new();
        let sender = MockNotificationSender::new();
        let service = make_service(directory.clone(), sender.clone());

        let outcome = service.notify(Some(make_offer())).await.unwrap();

        assert_eq!(outcome, NotifyOutcome::no_recipients());
        assert!(outcome.message.is_some_and(|m| !m.is_empty()));
        assert_eq!(directory.query_count(), 1);
        assert!(sender.attempts().is_empty());
    }

    #[tokio::test]
    async fn フィルタに一致しないユーザーには送信しない() {
        let directory = MockUserDirectory::new();
        directory.add_user(UserRecord {
            is_active: Some(false),
            ..customer("Inactive", Some("inactive@example.com"))
        });
        directory.add_user(UserRecord {
            push_notifications: false,
            ..customer("Muted", Some("muted@example.com"))
        });
        directory.add_user(customer("Marie", Some("marie@example.com")));
        let sender = MockNotificationSender::new();
        let service = make_service(directory, sender.clone());

        let outcome = service.notify(Some(make_offer())).await.unwrap();

        assert_eq!(outcome, NotifyOutcome::sent());
        assert_eq!(sender.recipients(), vec!["marie@example.com".to_string()]);
    }

    #[tokio::test]
    async fn メールアドレスが無いユーザーはスキップして他のユーザーには送信する() {
        let directory = MockUserDirectory::new();
        directory.add_user(customer("NoMail", None));
        directory.add_user(customer("Blank", Some("")));
        directory.add_user(customer("Marie", Some("marie@example.com")));
        directory.add_user(customer("Paul", Some("paul@example.com")));
        let sender = MockNotificationSender::new();
        let service = make_service(directory, sender.clone());

        let outcome = service.notify(Some(make_offer())).await.unwrap();

        assert_eq!(outcome, NotifyOutcome::sent());
        assert_eq!(
            sender.recipients(),
            vec!["marie@example.com".to_string(), "paul@example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn 全員メールアドレスが無い場合は何も送らず成功する() {
        let directory = MockUserDirectory::new();
        directory.add_user(customer("NoMail", None));
        let sender = MockNotificationSender::new();
        let service = make_service(directory, sender.clone());

        let outcome = service.notify(Some(make_offer())).await.unwrap();

        assert_eq!(outcome, NotifyOutcome::sent());
        assert!(sender.attempts().is_empty());
    }

    #[tokio::test]
    async fn 送信メールの件名と本文はオファーから生成される() {
        let directory = MockUserDirectory::new();
        directory.add_user(customer("Marie", Some("marie@example.com")));
        let sender = MockNotificationSender::new();
        let service = make_service(directory, sender.clone());

        service.notify(Some(make_offer())).await.unwrap();

        let attempts = sender.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].subject, "Nouvelle offre : Semaine verte");
        assert!(attempts[0].text_body.starts_with("Bonjour Marie,"));
        assert!(attempts[0].text_body.contains("Carrot"));
    }

    #[tokio::test]
    async fn 一件でも送信に失敗したら全体が失敗するが他の送信は試みる() {
        let directory = MockUserDirectory::new();
        directory.add_user(customer("Marie", Some("marie@example.com")));
        directory.add_user(customer("Paul", Some("paul@example.com")));
        directory.add_user(customer("Lea", Some("lea@example.com")));
        let sender = MockNotificationSender::new();
        sender.fail_for("paul@example.com");
        let service = make_service(directory, sender.clone());

        let result = service.notify(Some(make_offer())).await;

        assert!(matches!(result, Err(NotifierError::DispatchFailure(_))));
        assert_eq!(sender.attempts().len(), 3);
    }

    #[tokio::test]
    async fn ディレクトリの検索失敗はdirectory_query_failureを返す() {
        let directory = MockUserDirectory::failing("接続失敗");
        let sender = MockNotificationSender::new();
        let service = make_service(directory, sender.clone());

        let result = service.notify(Some(make_offer())).await;

        assert!(matches!(
            result,
            Err(NotifierError::DirectoryQueryFailure(_))
        ));
        assert!(sender.attempts().is_empty());
    }
}
