//! # VeggieCart インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはドメイン層のモデルを外部システム（DynamoDB、SMTP）に
//! 読み書きする具体的な実装を提供する。外部システムの詳細をカプセル化し、
//! アプリケーション層からは trait 越しに利用する。
//!
//! ## 依存関係
//!
//! ```text
//! apps → infra → domain
//!   ↘             ↑
//!     ───────────
//! ```
//!
//! ## モジュール構成
//!
//! - [`dynamodb`] - DynamoDB 接続管理と属性値 ↔ JSON 変換
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信（SMTP / Noop）
//! - [`repository`] - ユーザーディレクトリとカタログのリポジトリ
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use veggiecart_infra::{dynamodb, repository::DynamoDbUserDirectory};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client(Some("http://localhost:18000")).await;
//!     let directory = DynamoDbUserDirectory::new(client, "users".to_string());
//!     Ok(())
//! }
//! ```

pub mod dynamodb;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
