//! Logging setup.
//!
//! Console output follows `RUST_LOG` (default `info`); every INFO/WARN/ERROR
//! line is also appended to the sync log file.

use anyhow::Result;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter, fmt, fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt, EnvFilter, Layer,
};

/// Install console + file layers. Keep the returned guard alive until exit
/// so buffered lines reach the file.
pub fn init_logging(log_file: &str) -> Result<WorkerGuard> {
    let file_appender = open_log_file(log_file)?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_target(false).with_filter(console_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer(non_blocking_file))
        .try_init()?;

    Ok(guard)
}

/// 以追加模式打开日志文件，不轮转
pub fn open_log_file(log_file: &str) -> Result<RollingFileAppender> {
    let path = Path::new(log_file);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("日志文件路径无效: {}", log_file))?;

    std::fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| anyhow::anyhow!("日志文件打开失败 {}: {}", log_file, e))?;

    Ok(appender)
}

/// 文件日志层：无 ANSI，`时间戳 级别 消息`，INFO 及以上
pub fn file_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(make_writer)
        .with_filter(LevelFilter::INFO)
}
