//! # Observability 基盤
//!
//! Offer Notifier（常駐 HTTP サービス）と Catalog Importer（単発 CLI）の
//! トレーシング初期化を共通化する。
//!
//! - `LOG_FORMAT=json` で 1 行 1 イベントの JSON、それ以外は人間向けの形式
//! - `RUST_LOG` が無ければ呼び出し元が指定したディレクティブを使う
//! - 出力先はバイナリごとに選ぶ（CLI はオペレーター向けに stderr）

use std::str::FromStr;

/// デフォルトのフィルタディレクティブ
pub const DEFAULT_DIRECTIVES: &str = "info,veggiecart=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    /// 大文字小文字と前後の空白は区別しない
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "" => Ok(Self::Pretty),
            other => Err(format!("unknown LOG_FORMAT={other:?}")),
        }
    }
}

impl LogFormat {
    /// 環境変数 `LOG_FORMAT` から読み取る
    ///
    /// 不正な値は Pretty にフォールバックする。subscriber がまだ無いため警告は stderr に直接書く。
    pub fn from_env() -> Self {
        let Ok(value) = std::env::var("LOG_FORMAT") else {
            return Self::default();
        };
        value.parse().unwrap_or_else(|e| {
            eprintln!("WARNING: {e}, falling back to pretty");
            Self::Pretty
        })
    }
}

/// ログの出力先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（初期化ログに出力）
    pub service_name:       String,
    pub log_format:         LogFormat,
    pub output:             LogOutput,
    /// `RUST_LOG` 未設定時のディレクティブ
    pub default_directives: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            output: LogOutput::default(),
            default_directives: DEFAULT_DIRECTIVES.to_string(),
        }
    }

    /// `LOG_FORMAT` から出力形式を決めて作成する
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_default_directives(mut self, directives: impl Into<String>) -> Self {
        self.default_directives = directives.into();
        self
    }
}

/// トレーシングを初期化する
///
/// `tracing_error::ErrorLayer` も登録し、`InfraError` の `SpanTrace` にスパンが記録されるようにする。
/// プロセスで 1 回だけ呼ぶこと。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_directives.as_str().into());

    let fmt_layer = match config.output {
        LogOutput::Stdout => fmt_layer(config.log_format, std::io::stdout),
        LogOutput::Stderr => fmt_layer(config.log_format, std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::debug!(
        service = %config.service_name,
        log_format = ?config.log_format,
        output = ?config.output,
        "トレーシングを初期化しました"
    );
}

#[cfg(feature = "observability")]
fn fmt_layer<S, W>(
    format: LogFormat,
    writer: W,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + 'static,
    W: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    use tracing_subscriber::Layer as _;

    let layer = tracing_subscriber::fmt::layer().with_writer(writer);
    match format {
        LogFormat::Json => layer
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => layer.boxed(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn log_formatは大文字小文字を区別しない() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" JSON ".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("Pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
    }

    #[test]
    fn 空のlog_formatはprettyとして扱う() {
        assert_eq!("".parse::<LogFormat>(), Ok(LogFormat::Pretty));
    }

    #[test]
    fn 不明なlog_formatはエラーになる() {
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn newは標準出力とデフォルトのディレクティブを使う() {
        let config = TracingConfig::new("offer-notifier", LogFormat::Json);

        assert_eq!(config.service_name, "offer-notifier");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stdout);
        assert_eq!(config.default_directives, DEFAULT_DIRECTIVES);
    }

    #[test]
    fn 出力先とディレクティブを上書きできる() {
        let config = TracingConfig::new("catalog-importer", LogFormat::Pretty)
            .with_output(LogOutput::Stderr)
            .with_default_directives("warn,veggiecart_catalog_importer=info");

        assert_eq!(config.output, LogOutput::Stderr);
        assert_eq!(
            config.default_directives,
            "warn,veggiecart_catalog_importer=info"
        );
    }
}
