use std::path::Path;

/// # migra 日志系统使用说明
///
/// 1. **库代码只使用 `tracing` 宏**：migra-core 中只有 `debug!` / `info!` / `warn!`
/// 2. **应用入口控制日志配置**：在 `main.rs` 中调用 `setup_logging()`
/// 3. **迁移计划与日志分离**：`--dry-run` 的 JSON 走 stdout，日志走 stderr
///
/// ## 日志配置选项
/// - `-v, --verbose`：启用详细日志模式（DEBUG 级别）
/// - `RUST_LOG`：标准的 Rust 日志级别控制
/// - `MIGRA_LOG_FILE`：日志文件路径，设置后日志输出到文件而非终端
///
/// ```bash
/// # 详细日志输出到终端
/// migra -v generate alter --file sql/add_age.sql
///
/// # 日志输出到文件
/// MIGRA_LOG_FILE=migra.log migra generate create --file sql/products.sql
///
/// # 只看 SQL 解析细节
/// RUST_LOG=migra_core::ddl=debug migra generate create --file sql/products.sql
/// ```
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // 根据verbose参数和环境变量确定日志级别
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 检查环境变量，决定是否输出到文件
    if let Ok(log_file) = std::env::var("MIGRA_LOG_FILE") {
        let path = Path::new(&log_file);
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "migra.log".into());

        // 输出到文件 - 使用详细格式便于调试
        let appender = tracing_appender::rolling::never(directory, file_name);
        fmt()
            .with_env_filter(env_filter)
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .init();
    } else {
        // 输出到终端 - 使用简洁格式，用户友好
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_line_number(false)
            .without_time()
            .compact()
            .init();
    }
}
