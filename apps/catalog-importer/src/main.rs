//! # Catalog Importer
//!
//! ローカルの JSON ファイルからカタログテーブルへ一括で取り込む単発プログラム。
//!
//! ## 起動方法
//!
//! ```bash
//! # DynamoDB Local にテーブルを作成して取り込む
//! DYNAMODB_ENDPOINT=http://localhost:8000 CATALOG_ENSURE_TABLE=true \
//!   cargo run -p veggiecart-catalog-importer
//! ```
//!
//! 失敗時は非ゼロの終了コードで終了する。書き込み済みのエントリは残る。

use std::sync::Arc;

use anyhow::Context;
use veggiecart_catalog_importer::{CatalogImporter, ImportError, config::ImporterConfig};
use veggiecart_infra::{
    dynamodb,
    repository::{DynamoDbCatalogRepository, catalog_repository::CATALOG_KEY_ATTRIBUTE},
};
use veggiecart_shared::observability::{LogOutput, TracingConfig, init_tracing};

/// `RUST_LOG` 未設定時のディレクティブ（SDK の内部ログは warn 以上）
const DEFAULT_DIRECTIVES: &str = "info,veggiecart=debug,aws_config=warn,aws_smithy_runtime=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(
        TracingConfig::from_env("catalog-importer")
            .with_output(LogOutput::Stderr)
            .with_default_directives(DEFAULT_DIRECTIVES),
    );

    let config = ImporterConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(
        table = %config.catalog_table,
        source = %config.source_path.display(),
        "カタログの取り込みを開始します"
    );

    let client = dynamodb::create_client(config.dynamodb_endpoint.as_deref()).await;

    if config.ensure_table {
        dynamodb::ensure_catalog_table(&client, &config.catalog_table, CATALOG_KEY_ATTRIBUTE)
            .await
            .map_err(ImportError::TableSetup)?;
    }

    let repository = DynamoDbCatalogRepository::new(client, config.catalog_table);
    let count = CatalogImporter::new(Arc::new(repository))
        .run(&config.source_path)
        .await?;

    tracing::info!(count, "取り込みを終了します");
    Ok(())
}
