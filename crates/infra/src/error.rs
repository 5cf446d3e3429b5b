//! # インフラ層エラー定義
//!
//! DynamoDB 呼び出しと、属性値 ↔ ドキュメント ↔ ドメインモデルの変換で発生するエラー。
//!
//! [`InfraError`] は種別（[`InfraErrorKind`]）と生成時点の [`SpanTrace`] を持つ。
//! どのリポジトリ操作（`find_recipients`、`put_entry` 等）の中で失敗したかは
//! SpanTrace から辿れるため、メッセージには操作名と対象だけを書く。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::DynamoDb { operation: "Scan", .. } => { /* ... */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// DynamoDB API の呼び出しが失敗した
    ///
    /// SDK のエラー型は操作ごとに異なるため、文字列化して保持する。
    #[error("DynamoDB {operation} に失敗しました: {message}")]
    DynamoDb {
        /// API 名（`Scan`, `PutItem`, `CreateTable` 等）
        operation: &'static str,
        message:   String,
    },

    /// ドキュメントとドメインモデルの変換に失敗した
    #[error("ドキュメントの変換に失敗しました: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON で表現できない属性値を読み取った
    #[error("属性値を読み取れません: {0}")]
    Decode(String),

    /// リクエストの組み立てなど、外部要因ではない失敗
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 現在のスパンを記録してエラーを作成する
    fn capture(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn dynamo_db(operation: &'static str, message: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::DynamoDb {
            operation,
            message: message.into(),
        })
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::Decode(message.into()))
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::Unexpected(message.into()))
    }

    /// 失敗した DynamoDB API 名
    pub fn dynamo_db_operation(&self) -> Option<&'static str> {
        match self.kind {
            InfraErrorKind::DynamoDb { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self::capture(InfraErrorKind::Serialization(source))
    }
}
