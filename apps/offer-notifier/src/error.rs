//! # Offer Notifier エラー定義
//!
//! オファー通知で発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `InputMissing` | 400 Bad Request | オファーが指定されていない |
//! | `InvalidRequest` | 400 Bad Request | リクエストボディを読み取れない |
//! | `DirectoryQueryFailure` | 502 Bad Gateway | ユーザーディレクトリの検索失敗 |
//! | `DispatchFailure` | 502 Bad Gateway | メール送信の失敗（宛先は明かさない） |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use veggiecart_domain::notification::NotificationError;
use veggiecart_infra::InfraError;
use veggiecart_shared::event_log::error as log_error;

/// エラーレスポンス（RFC 7807 Problem Details）
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

/// Offer Notifier で発生するエラー
#[derive(Debug, Error)]
pub enum NotifierError {
    /// オファーが指定されていない
    #[error("オファーのデータがありません")]
    InputMissing,

    /// リクエストボディが JSON として不正、またはオファーの形式が合わない
    #[error("リクエストボディが不正です: {0}")]
    InvalidRequest(String),

    /// ユーザーディレクトリの検索に失敗
    #[error("ユーザーディレクトリの検索に失敗しました: {0}")]
    DirectoryQueryFailure(#[source] InfraError),

    /// メール送信に失敗（1 件以上）
    #[error("メールの送信に失敗しました")]
    DispatchFailure(#[source] NotificationError),
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        let (status, error_type, title, detail) = match &self {
            NotifierError::InputMissing => (
                StatusCode::BAD_REQUEST,
                "https://veggiecart.example.com/errors/input-missing",
                "Bad Request",
                self.to_string(),
            ),
            NotifierError::InvalidRequest(_) => (
                StatusCode::BAD_REQUEST,
                "https://veggiecart.example.com/errors/invalid-request",
                "Bad Request",
                self.to_string(),
            ),
            NotifierError::DirectoryQueryFailure(e) => {
                tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::DIRECTORY_QUERY,
                    "ユーザーディレクトリの検索に失敗: {}",
                    e
                );
                (
                    StatusCode::BAD_GATEWAY,
                    "https://veggiecart.example.com/errors/directory-query-failure",
                    "Bad Gateway",
                    "ユーザーディレクトリの検索に失敗しました".to_string(),
                )
            }
            NotifierError::DispatchFailure(e) => {
                tracing::error!(
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::MAIL_DISPATCH,
                    "メールの送信に失敗: {}",
                    e
                );
                (
                    StatusCode::BAD_GATEWAY,
                    "https://veggiecart.example.com/errors/dispatch-failure",
                    "Bad Gateway",
                    self.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error_type: error_type.to_string(),
                title: title.to_string(),
                status: status.as_u16(),
                detail,
            }),
        )
            .into_response()
    }
}
