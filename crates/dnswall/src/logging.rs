use std::fs::File;
use std::path::Path;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::filter_fn, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

pub const LOGGING_ENV: &str = "DNSWALL_LOG";
pub const LOGGING_FILE_ENV: &str = "DNSWALL_LOG_FILE";

pub fn setup_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let file_layer = log_file
        .map(|path| {
            let log_file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open the log file {}", path.display()))?;

            anyhow::Ok(
                layer()
                    .pretty()
                    .with_writer(log_file)
                    .with_ansi(false)
                    .with_filter(
                        EnvFilter::builder()
                            .with_env_var(LOGGING_FILE_ENV)
                            .with_default_directive(LevelFilter::TRACE.into())
                            .from_env_lossy(),
                    ),
            )
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(
            layer()
                .with_writer(std::io::stderr)
                .with_filter(LevelFilter::INFO)
                .and_then(
                    layer()
                        .with_writer(std::io::stderr)
                        .with_line_number(true)
                        .with_file(true)
                        .with_filter(filter_fn(|metadata| metadata.level() > &LevelFilter::INFO)),
                )
                .with_filter(
                    EnvFilter::builder()
                        .with_env_var(LOGGING_ENV)
                        .with_default_directive(LevelFilter::INFO.into())
                        .from_env_lossy(),
                ),
        )
        .with(file_layer)
        .try_init()
        .context("failed to initialize tracing_subscriber")
}
