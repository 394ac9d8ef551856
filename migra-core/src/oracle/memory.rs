use std::collections::HashMap;

use async_trait::async_trait;

use super::{SchemaOracle, TriggerRecord};
use crate::error::Result;

/// 内存中的元数据，用于测试和离线生成
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaOracle {
    columns: HashMap<String, Vec<String>>,
    triggers: HashMap<String, Vec<TriggerRecord>>,
}

impl StaticSchemaOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table<I, S>(mut self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .insert(table.to_string(), columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_trigger(mut self, record: TriggerRecord) -> Self {
        self.triggers
            .entry(record.table.clone())
            .or_default()
            .push(record);
        self
    }
}

#[async_trait]
impl SchemaOracle for StaticSchemaOracle {
    async fn columns_for_table(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn triggers_for_table(&self, table: &str) -> Result<Vec<TriggerRecord>> {
        Ok(self.triggers.get(table).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_oracle_lookup() {
        let oracle = StaticSchemaOracle::new()
            .with_table("users", ["id", "name"])
            .with_trigger(TriggerRecord {
                trigger: "users_di".to_string(),
                event: "INSERT".to_string(),
                table: "users".to_string(),
                statement: "BEGIN END".to_string(),
                timing: "AFTER".to_string(),
                created: None,
            });

        assert_eq!(oracle.columns_for_table("users").await.unwrap(), vec!["id", "name"]);
        assert!(oracle.columns_for_table("ghost").await.unwrap().is_empty());
        assert_eq!(oracle.triggers_for_table("users").await.unwrap().len(), 1);
        assert!(oracle.triggers_for_table("orders").await.unwrap().is_empty());
    }
}
