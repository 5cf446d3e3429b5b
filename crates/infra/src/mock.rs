//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! veggiecart-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::{BTreeMap, HashSet},
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::{Map, Value};
use veggiecart_domain::{
    catalog::CatalogEntry,
    notification::{EmailMessage, NotificationError},
    user::{RecipientFilter, UserRecord},
};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::{CatalogRepository, UserDirectory},
};

// ===== MockUserDirectory =====

/// インメモリのユーザーディレクトリ
///
/// 登録済みユーザーを [`RecipientFilter::matches`] で絞り込んで返す。
#[derive(Clone, Default)]
pub struct MockUserDirectory {
    users:       Arc<Mutex<Vec<UserRecord>>>,
    query_count: Arc<AtomicUsize>,
    failure:     Option<String>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全ての検索が失敗するディレクトリ
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn add_user(&self, user: UserRecord) {
        self.users.lock().unwrap().push(user);
    }

    /// 検索が呼ばれた回数
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn find_recipients(
        &self,
        filter: &RecipientFilter,
    ) -> Result<Vec<UserRecord>, InfraError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(InfraError::dynamo_db("Scan", message.clone()));
        }

        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }
}

// ===== MockCatalogRepository =====

/// インメモリのカタログ
///
/// ID → フィールドを保持し、書き込みは全置換する。
#[derive(Clone, Default)]
pub struct MockCatalogRepository {
    documents: Arc<Mutex<BTreeMap<String, Map<String, Value>>>>,
    writes:    Arc<Mutex<Vec<String>>>,
    fail_on:   Option<String>,
}

impl MockCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した ID の書き込みだけが失敗するカタログ
    pub fn failing_on(id: impl Into<String>) -> Self {
        Self {
            fail_on: Some(id.into()),
            ..Self::default()
        }
    }

    /// ドキュメントを取得する
    pub fn document(&self, id: &str) -> Option<Map<String, Value>> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    /// 保存済みドキュメントの ID 一覧（昇順）
    pub fn ids(&self) -> Vec<String> {
        self.documents.lock().unwrap().keys().cloned().collect()
    }

    /// 成功した書き込みの ID（書き込み順）
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogRepository for MockCatalogRepository {
    async fn put_entry(&self, entry: &CatalogEntry) -> Result<(), InfraError> {
        if self.fail_on.as_deref() == Some(entry.id()) {
            return Err(InfraError::dynamo_db(
                "PutItem",
                format!("カタログエントリ '{}' の書き込みに失敗", entry.id()),
            ));
        }

        self.documents
            .lock()
            .unwrap()
            .insert(entry.id().to_string(), entry.fields().clone());
        self.writes.lock().unwrap().push(entry.id().to_string());
        Ok(())
    }
}

// ===== MockNotificationSender =====

/// 送信内容を記録するメール送信
///
/// 送信を試みたメールは成否にかかわらず全て記録する。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    attempts:          Arc<Mutex<Vec<EmailMessage>>>,
    failing_addresses: Arc<Mutex<HashSet<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, address: impl Into<String>) {
        self.failing_addresses
            .lock()
            .unwrap()
            .insert(address.into());
    }

    /// 送信を試みたメール
    pub fn attempts(&self) -> Vec<EmailMessage> {
        self.attempts.lock().unwrap().clone()
    }

    /// 送信を試みた宛先
    pub fn recipients(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|email| email.to.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.attempts.lock().unwrap().push(email.clone());

        if self.failing_addresses.lock().unwrap().contains(&email.to) {
            return Err(NotificationError::SendFailed(format!(
                "{} への送信が拒否されました",
                email.to
            )));
        }
        Ok(())
    }
}
