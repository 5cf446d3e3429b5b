//! # DynamoDB 接続管理
//!
//! ユーザーディレクトリとカタログのドキュメントストアである Amazon DynamoDB への
//! 接続管理と、属性値（`AttributeValue`）と JSON の相互変換を行う。
//!
//! ## 設計方針
//!
//! - **ローカル開発**: `DYNAMODB_ENDPOINT` 指定時は DynamoDB Local に接続（ダミー認証情報）
//! - **本番環境**: エンドポイント未指定時は AWS のデフォルト認証チェーンを使用
//! - **クライアントはプロセスで 1 つ**: 作成したクライアントを各リポジトリに注入する
//! - **テーブル自動作成**: カタログテーブルが存在しなければ作成（冪等）
//!
//! ## 属性値の変換
//!
//! | JSON | AttributeValue |
//! |------|----------------|
//! | `null` | `NULL` |
//! | bool | `BOOL` |
//! | number | `N` |
//! | string | `S` |
//! | array | `L` |
//! | object | `M` |
//!
//! 読み取り時は `SS` / `NS` も配列として扱う。`B` / `BS` はデコードエラー。

use std::collections::HashMap;

use aws_sdk_dynamodb::{
    Client,
    types::{
        AttributeDefinition,
        AttributeValue,
        BillingMode,
        KeySchemaElement,
        KeyType,
        ScalarAttributeType,
    },
};
use serde_json::{Map, Number, Value};

use crate::InfraError;

/// DynamoDB のアイテム
pub type Item = HashMap<String, AttributeValue>;

/// DynamoDB クライアントを作成する
///
/// # 引数
///
/// * `endpoint` - DynamoDB Local のエンドポイント URL（例: `http://localhost:18000`）。
///   `None` の場合は AWS のデフォルト設定（リージョン・認証情報チェーン）を使用する。
pub async fn create_client(endpoint: Option<&str>) -> Client {
    let config = match endpoint {
        Some(endpoint) => {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .endpoint_url(endpoint)
                .region(aws_config::Region::new("eu-west-3"))
                // DynamoDB Local はクレデンシャルを検証しないが、SDK はプロバイダが必要
                .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                    "local", "local", None, None, "local",
                ))
                .load()
                .await
        }
        None => {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .load()
                .await
        }
    };

    Client::new(&config)
}

/// カタログテーブルが存在しなければ作成する（冪等）
///
/// テーブルスキーマ:
/// - PK: `key_attribute` (String) - カタログエントリの ID
///
/// # 引数
///
/// * `client` - DynamoDB クライアント
/// * `table_name` - テーブル名
/// * `key_attribute` - パーティションキーの属性名
pub async fn ensure_catalog_table(
    client: &Client,
    table_name: &str,
    key_attribute: &str,
) -> Result<(), InfraError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!("テーブル '{}' は既に存在します", table_name);
            return Ok(());
        }
        Err(err) => {
            // ResourceNotFoundException の場合のみテーブル作成に進む
            let not_found = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception());
            if !not_found {
                return Err(InfraError::dynamo_db(
                    "DescribeTable",
                    format!("テーブル '{table_name}': {err}"),
                ));
            }
        }
    }

    tracing::info!("テーブル '{}' を作成します", table_name);

    let create_result = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(key_attribute)
                .key_type(KeyType::Hash)
                .build()
                .map_err(|e| InfraError::unexpected(format!("KeySchema 構築エラー: {e}")))?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(key_attribute)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| {
                    InfraError::unexpected(format!("AttributeDefinition 構築エラー: {e}"))
                })?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    if let Err(err) = create_result {
        // ResourceInUseException は並行呼び出し時に発生しうる（テーブルが作成中）
        let in_use = err
            .as_service_error()
            .is_some_and(|e| e.is_resource_in_use_exception());
        if !in_use {
            return Err(InfraError::dynamo_db(
                "CreateTable",
                format!("テーブル '{table_name}': {err}"),
            ));
        }
        tracing::debug!(
            "テーブル '{}' は既に作成中または存在します（ResourceInUseException）",
            table_name
        );
        return Ok(());
    }

    tracing::info!("テーブル '{}' を作成しました", table_name);

    Ok(())
}

// ===== JSON → AttributeValue =====

/// JSON 値を属性値に変換する
pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(to_attribute_value).collect()),
        Value::Object(fields) => AttributeValue::M(to_item(fields)),
    }
}

/// JSON オブジェクトをアイテムに変換する
pub fn to_item(fields: &Map<String, Value>) -> Item {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute_value(value)))
        .collect()
}

// ===== AttributeValue → JSON =====

/// 属性値を JSON 値に変換する
pub fn from_attribute_value(value: &AttributeValue) -> Result<Value, InfraError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::L(values) => values
            .iter()
            .map(from_attribute_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(item) => from_item(item).map(Value::Object),
        other => Err(InfraError::decode(format!(
            "JSON で表現できない属性値です: {other:?}"
        ))),
    }
}

/// アイテムを JSON オブジェクトに変換する
pub fn from_item(item: &Item) -> Result<Map<String, Value>, InfraError> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), from_attribute_value(value)?)))
        .collect()
}

/// DynamoDB の数値文字列を JSON の数値に変換する
///
/// 整数として解釈できるものは整数、それ以外は浮動小数点数として扱う。
fn parse_number(n: &str) -> Result<Number, InfraError> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Number::from(u));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| InfraError::decode(format!("数値として解釈できません: {n}")))
}
