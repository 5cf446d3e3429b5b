//! # Catalog Importer エラー定義
//!
//! 取り込みはどのエラーでも即座に終了する。
//! 書き込み済みのエントリは取り消さない。

use std::path::PathBuf;

use thiserror::Error;
use veggiecart_infra::InfraError;

/// 取り込みで発生するエラー
#[derive(Debug, Error)]
pub enum ImportError {
    /// ソースファイルを読めない
    #[error("ソースファイル '{}' を読み込めません", .path.display())]
    SourceRead {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ソースファイルの形式が不正
    #[error("ソースファイル '{}' の形式が不正です: {detail}", .path.display())]
    SourceParse { path: PathBuf, detail: String },

    /// カタログテーブルの準備に失敗
    #[error("カタログテーブルの準備に失敗しました")]
    TableSetup(#[source] InfraError),

    /// エントリの書き込みに失敗
    #[error("カタログエントリ '{id}' の書き込みに失敗しました")]
    ImportWriteFailure {
        id:     String,
        #[source]
        source: InfraError,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn 書き込み失敗のメッセージにidを含む() {
        let error = ImportError::ImportWriteFailure {
            id:     "carrot".to_string(),
            source: InfraError::dynamo_db("PutItem", "throttled"),
        };

        assert_eq!(
            error.to_string(),
            "カタログエントリ 'carrot' の書き込みに失敗しました"
        );
        assert!(std::error::Error::source(&error).is_some());
    }
}
