use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::constants::markers;
use crate::error::Result;

/// 迁移文件拆分后的 UP / DOWN 两段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSections {
    pub up: String,
    pub down: String,
}

/// 按 `-- #UP` / `-- #DOWN` 标记拆分迁移文件
///
/// 没有 `#DOWN` 标记时 down 为空；两个标记都没有时整份内容视为 up。
pub fn split_migration_sql(content: &str) -> Result<MigrationSections> {
    let down_marker = Regex::new(&format!(r"(?im)^[ \t]*--[ \t]*{}\b[^\n]*$", markers::DOWN))?;
    let up_marker = Regex::new(&format!(r"(?im)^[ \t]*--[ \t]*{}\b[^\n]*$", markers::UP))?;

    let (up_part, down_part) = match down_marker.find(content) {
        Some(m) => (&content[..m.start()], &content[m.end()..]),
        None => (content, ""),
    };

    let up = up_marker.replace(up_part, "").trim().to_string();
    let down = down_part.trim().to_string();

    debug!("迁移文件拆分完成: up {} 字节, down {} 字节", up.len(), down.len());
    Ok(MigrationSections { up, down })
}
