//! # カタログ取り込み
//!
//! ソースファイルを一度だけ読み込み、エントリを 1 件ずつ順に書き込む。
//!
//! ## 設計方針
//!
//! - **読み込みが先**: ファイルの読み込み・パースに失敗した場合は 1 件も書き込まない
//! - **逐次書き込み**: 前の書き込みの完了を待ってから次を開始する
//! - **ロールバックなし**: 途中で失敗したら残りを中断し、書き込み済みのエントリはそのまま残す
//! - **ID 単位の全置換**: 再実行すると同じ ID のドキュメントは上書きされる

use std::{path::Path, sync::Arc};

use veggiecart_domain::catalog::{CatalogEntry, CatalogSource};
use veggiecart_infra::repository::CatalogRepository;
use veggiecart_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};

use crate::error::ImportError;

/// カタログ取り込み
pub struct CatalogImporter {
    repository: Arc<dyn CatalogRepository>,
}

impl CatalogImporter {
    pub fn new(repository: Arc<dyn CatalogRepository>) -> Self {
        Self { repository }
    }

    /// ソースファイルを読み込んで全エントリを取り込む
    ///
    /// 書き込んだエントリ数を返す。
    pub async fn run(&self, path: &Path) -> Result<usize, ImportError> {
        let entries = load_source(path).await?;
        tracing::info!(
            path = %path.display(),
            count = entries.len(),
            "ソースファイルを読み込みました"
        );
        self.import(&entries).await
    }

    /// エントリを順に書き込む
    ///
    /// 最初に失敗したエントリで中断し、`ImportWriteFailure` を返す。
    #[tracing::instrument(skip_all, fields(count = entries.len()))]
    pub async fn import(&self, entries: &[CatalogEntry]) -> Result<usize, ImportError> {
        for entry in entries {
            self.repository.put_entry(entry).await.map_err(|source| {
                tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::CATALOG_WRITE,
                    id = %entry.id(),
                    operation = source.dynamo_db_operation().unwrap_or("-"),
                    "カタログエントリの書き込みに失敗: {}",
                    source
                );
                ImportError::ImportWriteFailure {
                    id: entry.id().to_string(),
                    source,
                }
            })?;

            log_business_event!(
                event.category = event::category::CATALOG,
                event.action = event::action::CATALOG_ENTRY_IMPORTED,
                event.entity_type = event::entity_type::VEGETABLE,
                event.entity_id = %entry.id(),
                event.result = event::result::SUCCESS,
                "カタログエントリを追加しました: {}",
                entry.id()
            );
        }

        log_business_event!(
            event.category = event::category::CATALOG,
            event.action = event::action::CATALOG_IMPORT_COMPLETED,
            event.result = event::result::SUCCESS,
            count = entries.len(),
            "カタログの取り込みが完了しました"
        );

        Ok(entries.len())
    }
}

/// ソースファイルを読み込み、カタログエントリに変換する
pub async fn load_source(path: &Path) -> Result<Vec<CatalogEntry>, ImportError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;

    let parse_error = |detail: String| ImportError::SourceParse {
        path: path.to_path_buf(),
        detail,
    };

    let source = CatalogSource::from_json(&json).map_err(|e| parse_error(e.to_string()))?;
    if source.is_empty() {
        tracing::warn!(path = %path.display(), "ソースファイルにエントリがありません");
    }
    tracing::debug!(count = source.len(), "ソースファイルをパースしました");

    source.into_entries().map_err(|e| parse_error(e.to_string()))
}
