//! 迁移文件输出
//!
//! 迁移计划先完整生成，再交给这里一次性写盘。

pub mod sql;
pub mod typeorm;

use anyhow::Context;
use migra_core::config::OutputFormat;
use migra_core::migration::MigrationPlan;
use std::path::{Path, PathBuf};

/// 文件名与类名中使用的毫秒时间戳
pub fn migration_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 按格式写出迁移文件，返回写入的路径
pub fn write_migration(
    output_dir: &Path,
    format: OutputFormat,
    name: &str,
    timestamp: i64,
    plan: &MigrationPlan,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("创建输出目录失败: {}", output_dir.display()))?;

    let files = match format {
        OutputFormat::Typeorm => vec![typeorm::render_file(output_dir, name, timestamp, plan)],
        OutputFormat::Sql => sql::render_files(output_dir, name, timestamp, plan),
    };

    let mut written = Vec::with_capacity(files.len());
    for (path, content) in files {
        std::fs::write(&path, content)
            .with_context(|| format!("写入迁移文件失败: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
