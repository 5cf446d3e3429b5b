//! # Catalog Importer
//!
//! ローカルの JSON ファイルからカタログ（野菜一覧）を一括で取り込む。
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - 取り込みエラー
//! - [`importer`] - ソースファイルの読み込みと逐次書き込み

pub mod config;
pub mod error;
pub mod importer;

pub use error::ImportError;
pub use importer::CatalogImporter;
