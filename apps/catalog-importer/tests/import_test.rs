//! カタログ取り込み統合テスト
//!
//! 一時ディレクトリのソースファイルをインメモリのカタログに取り込む。
//!
//! ## テストケース
//!
//! - 全エントリを ID をキーとして書き込む
//! - 再実行すると同じ ID のドキュメントは全置換される
//! - 書き込みに失敗したら中断し、書き込み済みのエントリは残る
//! - ソースファイルが読めない場合は 1 件も書き込まない
//! - 空のカタログは 0 件で完了する

use std::{fs, path::PathBuf, sync::Arc};

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use veggiecart_catalog_importer::{CatalogImporter, ImportError};
use veggiecart_infra::mock::MockCatalogRepository;

fn write_source(dir: &TempDir, contents: serde_json::Value) -> PathBuf {
    let path = dir.path().join("vegetables.json");
    fs::write(&path, contents.to_string()).unwrap();
    path
}

#[tokio::test]
async fn 全エントリをidをキーとして書き込む() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(
        &dir,
        json!({"vegetables": {
            "a": {"name": "Carrot", "price": 1.5},
            "b": {"name": "Leek", "packaging": "bunch"}
        }}),
    );
    let repository = MockCatalogRepository::new();
    let importer = CatalogImporter::new(Arc::new(repository.clone()));

    let count = importer.run(&path).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(repository.ids(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(
        serde_json::Value::Object(repository.document("a").unwrap()),
        json!({"name": "Carrot", "price": 1.5})
    );
    assert_eq!(
        serde_json::Value::Object(repository.document("b").unwrap()),
        json!({"name": "Leek", "packaging": "bunch"})
    );
}

#[tokio::test]
async fn 再実行すると同じidのドキュメントは全置換される() {
    let dir = tempfile::tempdir().unwrap();
    let repository = MockCatalogRepository::new();
    let importer = CatalogImporter::new(Arc::new(repository.clone()));

    let path = write_source(
        &dir,
        json!({"vegetables": {"a": {"name": "Carrot", "price": 1.5, "organic": true}}}),
    );
    importer.run(&path).await.unwrap();

    let path = write_source(&dir, json!({"vegetables": {"a": {"name": "Carrot", "price": 2.0}}}));
    importer.run(&path).await.unwrap();

    assert_eq!(repository.ids(), vec!["a".to_string()]);
    assert_eq!(
        serde_json::Value::Object(repository.document("a").unwrap()),
        json!({"name": "Carrot", "price": 2.0})
    );
}

#[tokio::test]
async fn 書き込みに失敗したら中断し書き込み済みのエントリは残る() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(
        &dir,
        json!({"vegetables": {
            "a": {"name": "Carrot"},
            "b": {"name": "Leek"},
            "c": {"name": "Onion"}
        }}),
    );
    let repository = MockCatalogRepository::failing_on("b");
    let importer = CatalogImporter::new(Arc::new(repository.clone()));

    let result = importer.run(&path).await;

    assert!(matches!(
        result,
        Err(ImportError::ImportWriteFailure { ref id, .. }) if id == "b"
    ));
    assert_eq!(repository.writes(), vec!["a".to_string()]);
    assert!(repository.document("c").is_none());
}

#[tokio::test]
async fn ソースファイルが読めない場合は一件も書き込まない() {
    let dir = tempfile::tempdir().unwrap();
    let repository = MockCatalogRepository::new();
    let importer = CatalogImporter::new(Arc::new(repository.clone()));

    let result = importer.run(&dir.path().join("missing.json")).await;

    assert!(matches!(result, Err(ImportError::SourceRead { .. })));
    assert!(repository.writes().is_empty());
}

#[tokio::test]
async fn 空のカタログは0件で完了する() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, json!({"vegetables": {}}));
    let repository = MockCatalogRepository::new();
    let importer = CatalogImporter::new(Arc::new(repository.clone()));

    let count = importer.run(&path).await.unwrap();

    assert_eq!(count, 0);
    assert!(repository.writes().is_empty());
}
