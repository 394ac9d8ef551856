//! 迁移生成
//!
//! 四类迁移共用同一条流水线：拆分 UP/DOWN → 解析 → 跟踪列状态 →
//! 生成审计表与触发器 → 装配。只有 alter 需要读取数据库元数据。

mod alter;
mod create;
mod raw;
mod routine;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use crate::assembler::AssembledStatements;
use crate::constants::migration::{DEFAULT_NAME_PREFIX, NAME_MAX_LEN, NAME_MIN_LEN};
use crate::ddl::split_migration_sql;
use crate::error::{MigraError, Result};
use crate::oracle::SchemaOracle;
use crate::warning::Warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    /// 新建表，同时建审计表和触发器
    Create,
    /// 修改已有表，重建触发器
    Alter,
    /// 存储过程 / 函数
    Routine,
    /// 原样执行的 SQL
    Raw,
}

impl MigrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationKind::Create => "create",
            MigrationKind::Alter => "alter",
            MigrationKind::Routine => "routine",
            MigrationKind::Raw => "raw",
        }
    }
}

impl fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationKind {
    type Err = MigraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(MigrationKind::Create),
            "alter" => Ok(MigrationKind::Alter),
            "routine" => Ok(MigrationKind::Routine),
            "raw" | "custom" => Ok(MigrationKind::Raw),
            other => Err(MigraError::custom(format!("未知的迁移类型: {other}"))),
        }
    }
}

/// 生成结果：可直接执行的 UP / DOWN 语句和非致命警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    pub kind: MigrationKind,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl MigrationPlan {
    pub(crate) fn new(kind: MigrationKind, statements: AssembledStatements, warnings: Vec<Warning>) -> Self {
        Self {
            kind,
            up: statements.up,
            down: statements.down,
            warnings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }
}

/// 迁移生成器，alter 迁移需要 `SchemaOracle`
#[derive(Clone, Copy, Default)]
pub struct MigrationGenerator<'a> {
    oracle: Option<&'a dyn SchemaOracle>,
}

impl<'a> MigrationGenerator<'a> {
    pub fn new() -> Self {
        Self { oracle: None }
    }

    pub fn with_oracle(oracle: &'a dyn SchemaOracle) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    /// 由迁移文件内容生成迁移计划
    ///
    /// `content` 为 `None` 只对 raw 合法，生成空的骨架迁移。
    pub async fn generate(&self, kind: MigrationKind, content: Option<&str>) -> Result<MigrationPlan> {
        let Some(content) = content else {
            return match kind {
                MigrationKind::Raw => Ok(raw::empty_migration()),
                _ => Err(MigraError::missing_input(format!("{kind} 迁移需要提供 SQL 文件"))),
            };
        };

        let sections = split_migration_sql(content)?;
        let plan = match kind {
            MigrationKind::Create => create::generate_create_migration(&sections)?,
            MigrationKind::Alter => {
                let oracle = self.oracle.ok_or_else(|| {
                    MigraError::missing_input("alter 迁移需要数据库连接来读取表结构")
                })?;
                alter::generate_alter_migration(&sections, oracle).await?
            }
            MigrationKind::Routine => routine::generate_routine_migration(&sections)?,
            MigrationKind::Raw => raw::generate_raw_migration(&sections),
        };

        info!(
            "{} 迁移生成完成: up {} 条, down {} 条, 警告 {} 个",
            kind,
            plan.up.len(),
            plan.down.len(),
            plan.warnings.len()
        );
        Ok(plan)
    }
}

/// 迁移名称长度必须在 3 到 255 个字符之间
pub fn validate_migration_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len < NAME_MIN_LEN {
        return Err(MigraError::custom(format!(
            "迁移名称至少需要 {NAME_MIN_LEN} 个字符"
        )));
    }
    if len > NAME_MAX_LEN {
        return Err(MigraError::custom(format!(
            "迁移名称不能超过 {NAME_MAX_LEN} 个字符"
        )));
    }
    Ok(())
}

/// 默认迁移名称：`Migration<毫秒时间戳>`
pub fn default_migration_name() -> String {
    format!(
        "{DEFAULT_NAME_PREFIX}{}",
        chrono::Utc::now().timestamp_millis()
    )
}
