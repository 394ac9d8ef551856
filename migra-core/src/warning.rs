use serde::Serialize;
use std::fmt;

/// 非致命诊断，随迁移计划一起返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// 语句对审计表没有对应含义
    UnsupportedStatement { statement: String },
    /// ALTER TABLE 中无法识别的子句
    UnsupportedAlterClause { table: String, clause: String },
    /// 对不存在的列执行了 drop / modify / change / rename_column
    MissingColumn {
        table: String,
        column: String,
        action: String,
    },
    /// 数据库中找不到预期的触发器
    MissingTrigger { table: String, trigger: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnsupportedStatement { statement } => {
                write!(f, "审计表不支持该语句，已忽略: {statement}")
            }
            Warning::UnsupportedAlterClause { table, clause } => {
                write!(f, "表 {table} 的 ALTER 子句不受支持，已跳过: {clause}")
            }
            Warning::MissingColumn {
                table,
                column,
                action,
            } => write!(f, "表 {table} 中不存在列 {column}，{action} 操作未生效"),
            Warning::MissingTrigger { table, trigger } => {
                write!(f, "表 {table} 缺少触发器 {trigger}，仅生成删除语句")
            }
        }
    }
}
