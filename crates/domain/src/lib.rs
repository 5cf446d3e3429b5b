//! # VeggieCart ドメイン層
//!
//! 週替わりオファー通知とカタログ取り込みで扱うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **インフラ非依存**: DynamoDB や SMTP の型はこのクレートに現れない
//! - **読み取り専用モデル**: [`user::UserRecord`] はこのシステムから変更されない
//! - **欠損値は表示で吸収**: [`offer::VegetableLine`] の欠損フィールドはプレースホルダーで表示し、
//!   エラーにしない
//!
//! ## モジュール構成
//!
//! - [`offer`] - オファーと野菜明細
//! - [`user`] - ユーザーレコードと受信者フィルタ
//! - [`catalog`] - カタログエントリとソースファイル形式
//! - [`notification`] - メールメッセージと送信エラー
//! - [`error`] - ドメイン層エラー定義

pub mod catalog;
pub mod error;
pub mod notification;
pub mod offer;
pub mod user;

pub use error::DomainError;
