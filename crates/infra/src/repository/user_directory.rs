//! # UserDirectory
//!
//! ユーザーディレクトリ（`users` テーブル）から通知対象のユーザーを検索する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: このシステムはユーザーを更新しない
//! - **等価条件の論理積**: `Scan` + `FilterExpression` で
//!   `pushNotifications = true AND profile = :profile [AND isActive = true]`
//! - **全件取得**: `LastEvaluatedKey` を辿り、テーブル全体を読み切ってから返す
//! - **壊れたドキュメントは読み飛ばす**: ユーザーモデルに変換できないアイテムは警告を出して除外する
//! - **予約語回避**: `name` 等は DynamoDB の予約語のため、属性名は全てプレースホルダー経由

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, types::AttributeValue};
use veggiecart_domain::user::{RecipientFilter, UserRecord};

use crate::{
    InfraError,
    dynamodb::{self, Item},
};

/// ユーザーディレクトリトレイト
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// フィルタ条件に一致するユーザーを検索する
    ///
    /// 結果の順序は保証しない。メールアドレスの有無では絞り込まない。
    async fn find_recipients(&self, filter: &RecipientFilter)
    -> Result<Vec<UserRecord>, InfraError>;
}

/// DynamoDB 実装の UserDirectory
pub struct DynamoDbUserDirectory {
    client:     Client,
    table_name: String,
    page_size:  Option<i32>,
}

impl DynamoDbUserDirectory {
    pub fn new(client: Client, table_name: String) -> Self {
        Self {
            client,
            table_name,
            page_size: None,
        }
    }

    /// 1 回の Scan で評価するアイテム数の上限（`Limit`）を設定する
    ///
    /// 上限はフィルタ適用前の件数に掛かる。未設定なら 1 MB ごとのページになる。
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Scan に渡すフィルタ式
struct ScanFilter {
    expression: String,
    names:      HashMap<String, String>,
    values:     HashMap<String, AttributeValue>,
}

impl ScanFilter {
    fn from_recipient_filter(filter: &RecipientFilter) -> Self {
        let mut expression = "#push = :push AND #profile = :profile".to_string();
        let mut names = HashMap::from([
            ("#push".to_string(), "pushNotifications".to_string()),
            ("#profile".to_string(), "profile".to_string()),
        ]);
        let mut values = HashMap::from([
            (":push".to_string(), AttributeValue::Bool(true)),
            (
                ":profile".to_string(),
                AttributeValue::S(filter.profile.clone()),
            ),
        ]);

        if filter.require_active {
            expression.push_str(" AND #active = :active");
            names.insert("#active".to_string(), "isActive".to_string());
            values.insert(":active".to_string(), AttributeValue::Bool(true));
        }

        Self {
            expression,
            names,
            values,
        }
    }
}

/// アイテムをユーザーレコードにデコードする
fn decode_user(item: &Item) -> Result<UserRecord, InfraError> {
    let document = dynamodb::from_item(item)?;
    Ok(serde_json::from_value(serde_json::Value::Object(document))?)
}

#[async_trait]
impl UserDirectory for DynamoDbUserDirectory {
    #[tracing::instrument(skip_all, level = "debug", fields(profile = %filter.profile))]
    async fn find_recipients(
        &self,
        filter: &RecipientFilter,
    ) -> Result<Vec<UserRecord>, InfraError> {
        let scan_filter = ScanFilter::from_recipient_filter(filter);
        let mut users = Vec::new();
        let mut skipped = 0usize;
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression(&scan_filter.expression)
                .set_expression_attribute_names(Some(scan_filter.names.clone()))
                .set_expression_attribute_values(Some(scan_filter.values.clone()))
                .set_limit(self.page_size)
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| {
                    InfraError::dynamo_db("Scan", DisplayErrorContext(&e).to_string())
                })?;

            for item in output.items.unwrap_or_default() {
                match decode_user(&item) {
                    Ok(user) => users.push(user),
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(
                            error = %e,
                            "ユーザーレコードに変換できないドキュメントを除外しました"
                        );
                    }
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(
            count = users.len(),
            skipped,
            "ユーザーディレクトリの検索が完了"
        );

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn 標準フィルタはis_activeを条件に含める() {
        let filter = ScanFilter::from_recipient_filter(&RecipientFilter::active_customers());

        assert_eq!(
            filter.expression,
            "#push = :push AND #profile = :profile AND #active = :active"
        );
        assert_eq!(filter.names["#active"], "isActive");
        assert_eq!(
            filter.values[":profile"],
            AttributeValue::S("customer".to_string())
        );
        assert_eq!(filter.values[":active"], AttributeValue::Bool(true));
    }

    #[test]
    fn 旧フィルタはis_activeを条件に含めない() {
        let filter = ScanFilter::from_recipient_filter(&RecipientFilter::legacy_clients());

        assert_eq!(filter.expression, "#push = :push AND #profile = :profile");
        assert!(!filter.names.contains_key("#active"));
        assert!(!filter.values.contains_key(":active"));
        assert_eq!(
            filter.values[":profile"],
            AttributeValue::S("Client".to_string())
        );
    }

    #[test]
    fn アイテムをユーザーレコードにデコードできる() {
        let item = HashMap::from([
            (
                "email".to_string(),
                AttributeValue::S("marie@example.com".to_string()),
            ),
            (
                "givenName".to_string(),
                AttributeValue::S("Marie".to_string()),
            ),
            ("name".to_string(), AttributeValue::S("Curie".to_string())),
            ("pushNotifications".to_string(), AttributeValue::Bool(true)),
            (
                "profile".to_string(),
                AttributeValue::S("customer".to_string()),
            ),
            ("isActive".to_string(), AttributeValue::Bool(true)),
            (
                "createdAt".to_string(),
                AttributeValue::S("2024-01-01".to_string()),
            ),
        ]);

        let user = decode_user(&item).unwrap();

        assert_eq!(user.notification_address(), Some("marie@example.com"));
        assert_eq!(user.display_name(), "Marie Curie");
        assert!(RecipientFilter::active_customers().matches(&user));
    }

    #[test]
    fn null属性は既定値としてデコードする() {
        let item = HashMap::from([
            (
                "email".to_string(),
                AttributeValue::S("paul@example.com".to_string()),
            ),
            ("givenName".to_string(), AttributeValue::Null(true)),
            ("pushNotifications".to_string(), AttributeValue::Bool(true)),
            (
                "profile".to_string(),
                AttributeValue::S("customer".to_string()),
            ),
            ("isActive".to_string(), AttributeValue::Bool(true)),
        ]);

        let user = decode_user(&item).unwrap();

        assert_eq!(user.given_name, "");
        assert_eq!(user.notification_address(), Some("paul@example.com"));
        assert!(RecipientFilter::active_customers().matches(&user));
    }

    #[test]
    fn 文字列でないemailはシリアライズエラー() {
        let item = HashMap::from([
            ("email".to_string(), AttributeValue::N("0".to_string())),
            (
                "givenName".to_string(),
                AttributeValue::S("Paul".to_string()),
            ),
        ]);

        let err = decode_user(&item).unwrap_err();

        assert!(matches!(
            err.kind(),
            crate::InfraErrorKind::Serialization(_)
        ));
    }

    #[test]
    fn 型が合わない属性はシリアライズエラー() {
        let item = HashMap::from([(
            "pushNotifications".to_string(),
            AttributeValue::S("yes".to_string()),
        )]);

        let err = decode_user(&item).unwrap_err();

        assert!(matches!(
            err.kind(),
            crate::InfraErrorKind::Serialization(_)
        ));
    }
}
