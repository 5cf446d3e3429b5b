//! # リポジトリ
//!
//! ドキュメントストア（DynamoDB）に対する読み書きを trait で抽象化する。
//!
//! - [`UserDirectory`] - ユーザーディレクトリの読み取り（通知対象の検索）
//! - [`CatalogRepository`] - カタログへの書き込み（ID 単位の全置換）

pub mod catalog_repository;
pub mod user_directory;

pub use catalog_repository::{CatalogRepository, DynamoDbCatalogRepository};
pub use user_directory::{DynamoDbUserDirectory, UserDirectory};
