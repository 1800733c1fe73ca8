use crate::config::LoggingSettings;
use crate::error::{Result, TemplateError};
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;

/// 将配置中的日志级别字符串转换为 tracing 过滤器，未知值回退到 INFO
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// 初始化 tracing：stderr 输出，配置了文件名时同时写入 `log_dir` 下的日志文件
///
/// 返回的 guard 必须存活到进程结束，否则非阻塞写入线程会提前退出
pub fn init_tracing(settings: Option<&LoggingSettings>, log_dir: &Path) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Layer;

    let level = settings
        .map(|logging| parse_level(&logging.level))
        .unwrap_or(LevelFilter::INFO);

    let file_name = settings
        .and_then(|logging| logging.file_name.as_ref())
        .filter(|name| !name.is_empty())
        .cloned();

    let (file_layer, guard) = match file_name {
        Some(file_name) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = tracing_appender::rolling::never(log_dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(level);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(level))
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        TemplateError::ConfigError(format!("Failed to set tracing subscriber: {}", e))
    })?;

    Ok(guard)
}
