//! # Catalog Importer 設定
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `DYNAMODB_ENDPOINT` | なし | DynamoDB Local のエンドポイント（未設定で AWS デフォルト） |
//! | `CATALOG_TABLE` | `vegetables` | カタログのテーブル名 |
//! | `CATALOG_SOURCE_PATH` | `vegetables.json` | ソースファイルのパス |
//! | `CATALOG_ENSURE_TABLE` | `false` | 取り込み前にテーブルを作成するか |

use std::{env, path::PathBuf};

use anyhow::bail;

/// Catalog Importer の設定
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    pub dynamodb_endpoint: Option<String>,
    pub catalog_table:     String,
    pub source_path:       PathBuf,
    /// テーブルが無ければ作成する
    pub ensure_table:      bool,
}

impl ImporterConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let ensure_table = match lookup("CATALOG_ENSURE_TABLE").as_deref() {
            None | Some("false" | "0") => false,
            Some("true" | "1") => true,
            Some(other) => {
                bail!("CATALOG_ENSURE_TABLE は true または false である必要があります: {other}")
            }
        };

        Ok(Self {
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.is_empty()),
            catalog_table: lookup("CATALOG_TABLE").unwrap_or_else(|| "vegetables".to_string()),
            source_path: lookup("CATALOG_SOURCE_PATH")
                .map_or_else(|| PathBuf::from("vegetables.json"), PathBuf::from),
            ensure_table,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<ImporterConfig> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        ImporterConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn 未設定の場合はデフォルト値を使う() {
        let config = load(&[]).unwrap();

        assert_eq!(config.dynamodb_endpoint, None);
        assert_eq!(config.catalog_table, "vegetables");
        assert_eq!(config.source_path, PathBuf::from("vegetables.json"));
        assert!(!config.ensure_table);
    }

    #[test]
    fn 環境変数の値で上書きできる() {
        let config = load(&[
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("CATALOG_TABLE", "catalog"),
            ("CATALOG_SOURCE_PATH", "/data/vegetables.json"),
            ("CATALOG_ENSURE_TABLE", "true"),
        ])
        .unwrap();

        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.catalog_table, "catalog");
        assert_eq!(config.source_path, PathBuf::from("/data/vegetables.json"));
        assert!(config.ensure_table);
    }

    #[test]
    fn 不正な真偽値はエラーになる() {
        assert!(load(&[("CATALOG_ENSURE_TABLE", "yes")]).is_err());
    }
}
