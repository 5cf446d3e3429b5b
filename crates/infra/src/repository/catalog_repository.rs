//! # CatalogRepository
//!
//! カタログ（`vegetables` テーブル）にエントリを書き込む。
//!
//! ## 設計方針
//!
//! - **ID 単位の全置換**: `PutItem` で既存ドキュメントを丸ごと置き換える（マージしない）
//! - **フィールドはそのまま**: エントリのフィールドを解釈せずに属性値へ変換する
//! - **キー属性**: `id`。エントリに同名のフィールドがあってもキーで上書きされる

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, types::AttributeValue};
use veggiecart_domain::catalog::CatalogEntry;

use crate::{
    InfraError,
    dynamodb::{self, Item},
};

/// カタログテーブルのキー属性名
pub const CATALOG_KEY_ATTRIBUTE: &str = "id";

/// カタログリポジトリトレイト
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// エントリを ID をキーとして書き込む（既存ドキュメントは全置換）
    async fn put_entry(&self, entry: &CatalogEntry) -> Result<(), InfraError>;
}

/// DynamoDB 実装の CatalogRepository
pub struct DynamoDbCatalogRepository {
    client:     Client,
    table_name: String,
}

impl DynamoDbCatalogRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

/// エントリを書き込み用のアイテムに変換する
fn entry_to_item(entry: &CatalogEntry) -> Item {
    let mut item = dynamodb::to_item(entry.fields());
    item.insert(
        CATALOG_KEY_ATTRIBUTE.to_string(),
        AttributeValue::S(entry.id().to_string()),
    );
    item
}

#[async_trait]
impl CatalogRepository for DynamoDbCatalogRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(id = %entry.id()))]
    async fn put_entry(&self, entry: &CatalogEntry) -> Result<(), InfraError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(entry_to_item(entry)))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(
                    "PutItem",
                    format!("カタログエントリ '{}': {}", entry.id(), DisplayErrorContext(&e)),
                )
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn アイテムにはキー属性とフィールドが含まれる() {
        let fields = json!({"name": "Carrot", "price": 1.5})
            .as_object()
            .cloned()
            .unwrap();
        let entry = CatalogEntry::new("carrot", fields).unwrap();

        let item = entry_to_item(&entry);

        assert_eq!(item.len(), 3);
        assert_eq!(item["id"], AttributeValue::S("carrot".to_string()));
        assert_eq!(item["name"], AttributeValue::S("Carrot".to_string()));
        assert_eq!(item["price"], AttributeValue::N("1.5".to_string()));
    }

    #[test]
    fn 同名のidフィールドはキーで上書きされる() {
        let fields = json!({"id": "legacy-42", "name": "Leek"})
            .as_object()
            .cloned()
            .unwrap();
        let entry = CatalogEntry::new("leek", fields).unwrap();

        let item = entry_to_item(&entry);

        assert_eq!(item["id"], AttributeValue::S("leek".to_string()));
    }
}
