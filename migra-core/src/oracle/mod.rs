//! 表结构元数据来源
//!
//! 生成 alter 迁移时需要知道表的当前列和现有触发器。数据库只作为只读
//! 的元数据来源，由调用方以参数形式传入。

mod memory;
mod mysql;

pub use memory::StaticSchemaOracle;
pub use mysql::MySqlSchemaOracle;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// information_schema.TRIGGERS 中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub trigger: String,
    /// INSERT / UPDATE / DELETE
    pub event: String,
    pub table: String,
    /// 触发器主体，通常是 `BEGIN ... END`
    pub statement: String,
    /// BEFORE / AFTER
    pub timing: String,
    pub created: Option<String>,
}

#[async_trait]
pub trait SchemaOracle: Send + Sync {
    /// 按列顺序返回表的列名；表不存在时返回空列表
    async fn columns_for_table(&self, table: &str) -> Result<Vec<String>>;

    /// 返回表上现有的触发器
    async fn triggers_for_table(&self, table: &str) -> Result<Vec<TriggerRecord>>;
}
