//! # カタログ
//!
//! カタログ取り込みの入力（ソースファイル）と、1 件ずつ書き込むエントリを定義する。
//!
//! ## ソースファイル形式
//!
//! ```json
//! {
//!   "vegetables": {
//!     "carrot": { "name": "Carrot", "price": 1.5 },
//!     "leek":   { "name": "Leek" }
//!   }
//! }
//! ```
//!
//! エントリのフィールドは解釈せず、そのままドキュメントとして書き込む。

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::DomainError;

/// カタログエントリ
///
/// `id` をドキュメントキーとし、`fields` をそのまま保存する。
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    id:     String,
    fields: Map<String, Value>,
}

impl CatalogEntry {
    /// エントリを作成する
    ///
    /// # エラー
    ///
    /// `id` が空の場合は `DomainError::Validation` を返す。
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::Validation(
                "カタログエントリの ID は必須です".to_string(),
            ));
        }
        Ok(Self { id, fields })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// カタログのソースファイル
#[derive(Debug, Deserialize)]
pub struct CatalogSource {
    /// ID → エントリのフィールド
    vegetables: Map<String, Value>,
}

impl CatalogSource {
    /// JSON 文字列からパースする
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// エントリ数
    pub fn len(&self) -> usize {
        self.vegetables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vegetables.is_empty()
    }

    /// カタログエントリに変換する
    ///
    /// 値がオブジェクトでないエントリがあれば `DomainError::Validation` を返す。
    pub fn into_entries(self) -> Result<Vec<CatalogEntry>, DomainError> {
        self.vegetables
            .into_iter()
            .map(|(id, value)| match value {
                Value::Object(fields) => CatalogEntry::new(id, fields),
                other => Err(DomainError::Validation(format!(
                    "カタログエントリ '{id}' はオブジェクトである必要があります: {other}"
                ))),
            })
            .collect()
    }
}
