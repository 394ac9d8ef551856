use anyhow::Context;
use migra_core::{config::AppConfig, constants::config};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::project_info::{get_copyright_info, get_version_string};

/// 生成默认配置文件和输入 / 输出目录
pub fn run_init(force: bool, config_path: Option<&Path>) -> anyhow::Result<()> {
    info!("🛠  {} 初始化", get_version_string());
    debug!("{}", get_copyright_info());

    let default_path = config::get_config_file_path();
    let path = config_path.unwrap_or(default_path.as_path());

    // 检查是否已经初始化过
    if path.exists() && !force {
        warn!("⚠️  配置文件已存在: {}", path.display());
        info!("如果您要重新生成，请使用 --force 参数");
        info!("示例: migra init --force");
        return Ok(());
    }

    let config = AppConfig::default();
    config
        .save_to_file(path)
        .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
    info!("   ✅ 创建配置文件: {}", path.display());

    for dir in [&config.output.dir, &config.sql.files_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("创建目录失败: {dir}"))?;
    }
    info!("   ✅ 创建目录结构:");
    info!("      - {}  (迁移输出目录)", config.output.dir);
    info!("      - {}  (SQL 输入目录)", config.sql.files_dir);

    info!("🎉 初始化完成！");
    info!("📝 接下来的步骤:");
    info!("   1️⃣  在 {} 中编写带 -- #UP / -- #DOWN 段的 SQL 文件", config.sql.files_dir);
    info!("   2️⃣  运行 'migra generate create --file <文件>' 生成建表迁移");
    info!("   3️⃣  alter 迁移需要在配置文件 [database] 段或 MIGRA_DATABASE_URL 中提供数据库连接");
    Ok(())
}
