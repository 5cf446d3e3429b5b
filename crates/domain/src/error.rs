//! # ドメイン層エラー定義
//!
//! ドメインモデルの構築時に検出される不正な状態を表現する。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がドメインルールに違反している場合に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
