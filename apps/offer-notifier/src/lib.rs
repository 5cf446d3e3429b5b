//! # Offer Notifier ライブラリ
//!
//! 週替わりオファーを通知対象ユーザーにメールで送るユースケースと、
//! それを呼び出す HTTP ハンドラを公開する。
//! テスト用に内部モジュールへのアクセスを提供する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;

pub use app_builder::build_app;
