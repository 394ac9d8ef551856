//! 表结构状态跟踪
//!
//! 只关心列名及其顺序：触发器按位置把业务列写入审计表，列顺序必须与
//! 表自身一致。

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::ddl::{AlterOperation, AlterTableDefinition};
use crate::warning::Warning;

/// 一组操作应用后的列名列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedColumns {
    pub columns: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// 按顺序把 ALTER 操作应用到列名列表上（纯函数）
///
/// 引用不存在列的 drop / modify / change / rename_column 不改变列表，
/// 但会产生 `Warning::MissingColumn`。
pub fn apply_operations(
    table: &str,
    current: &[String],
    operations: &[AlterOperation],
) -> AppliedColumns {
    let mut columns = current.to_vec();
    let mut warnings = Vec::new();

    for operation in operations {
        let missing = match operation {
            AlterOperation::Add(column) => {
                columns.push(column.name.clone());
                None
            }
            AlterOperation::Drop { column_name } => {
                let before = columns.len();
                columns.retain(|c| c != column_name);
                (columns.len() == before).then_some(column_name)
            }
            AlterOperation::Modify(column) => {
                // 列名不变，只校验存在性
                (!columns.contains(&column.name)).then_some(&column.name)
            }
            AlterOperation::Change {
                old_column_name,
                column,
            } => rename_in_place(&mut columns, old_column_name, &column.name),
            AlterOperation::RenameColumn {
                old_column_name,
                new_column_name,
            } => rename_in_place(&mut columns, old_column_name, new_column_name),
            AlterOperation::AddIndex { .. }
            | AlterOperation::DropIndex { .. }
            | AlterOperation::AddConstraint(_)
            | AlterOperation::DropConstraint { .. }
            | AlterOperation::RenameTable { .. } => None,
        };

        if let Some(column) = missing {
            let warning = Warning::MissingColumn {
                table: table.to_string(),
                column: column.clone(),
                action: operation.action().to_string(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    AppliedColumns { columns, warnings }
}

fn rename_in_place<'a>(columns: &mut [String], old: &'a String, new: &str) -> Option<&'a String> {
    match columns.iter_mut().find(|c| c.as_str() == old.as_str()) {
        Some(slot) => {
            *slot = new.to_string();
            None
        }
        None => Some(old),
    }
}

/// 一次生成过程内各表的当前列名
#[derive(Debug, Clone, Default)]
pub struct SchemaState {
    tables: HashMap<String, Vec<String>>,
}

impl SchemaState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用数据库或 CREATE TABLE 的列初始化一张表
    pub fn seed(&mut self, table: impl Into<String>, columns: Vec<String>) {
        self.tables.insert(table.into(), columns);
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// 应用一条 ALTER TABLE；RENAME TO 会把状态迁移到新表名下
    pub fn apply(&mut self, definition: &AlterTableDefinition) -> Vec<Warning> {
        let current = self
            .tables
            .remove(&definition.table_name)
            .unwrap_or_default();
        let applied = apply_operations(&definition.table_name, &current, &definition.operations);

        let key = definition
            .operations
            .iter()
            .rev()
            .find_map(|op| match op {
                AlterOperation::RenameTable { new_table_name } => Some(new_table_name.clone()),
                _ => None,
            })
            .unwrap_or_else(|| definition.table_name.clone());

        debug!("表 {} 当前列: {:?}", key, applied.columns);
        self.tables.insert(key, applied.columns);
        applied.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::ColumnDefinition;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn add(name: &str) -> AlterOperation {
        AlterOperation::Add(ColumnDefinition {
            name: name.to_string(),
            column_type: "INT".to_string(),
            is_nullable: true,
            is_primary_key: false,
            default: None,
            extra: None,
        })
    }

    fn drop(name: &str) -> AlterOperation {
        AlterOperation::Drop {
            column_name: name.to_string(),
        }
    }

    #[test]
    fn test_rename_column_in_place() {
        let applied = apply_operations(
            "orders",
            &cols(&["id", "user_id"]),
            &[AlterOperation::RenameColumn {
                old_column_name: "user_id".to_string(),
                new_column_name: "client_id".to_string(),
            }],
        );
        assert_eq!(applied.columns, cols(&["id", "client_id"]));
        assert!(applied.warnings.is_empty());
    }

    #[test]
    fn test_add_then_drop_is_noop() {
        let original = cols(&["id", "name"]);
        let applied = apply_operations("users", &original, &[add("tmp"), drop("tmp")]);
        assert_eq!(applied.columns, original);
        assert!(applied.warnings.is_empty());
    }

    #[test]
    fn test_adds_preserve_call_order() {
        let applied = apply_operations("t", &cols(&["id"]), &[add("c"), add("a"), add("b")]);
        assert_eq!(applied.columns, cols(&["id", "c", "a", "b"]));
    }

    #[test]
    fn test_change_and_modify() {
        let mut changed = match add("total") {
            AlterOperation::Add(c) => c,
            _ => unreachable!(),
        };
        changed.column_type = "DECIMAL(10, 2)".to_string();
        let ops = vec![
            AlterOperation::Change {
                old_column_name: "amount".to_string(),
                column: changed.clone(),
            },
            AlterOperation::Modify(changed),
        ];
        let applied = apply_operations("orders", &cols(&["id", "amount", "note"]), &ops);
        assert_eq!(applied.columns, cols(&["id", "total", "note"]));
        assert!(applied.warnings.is_empty());
    }

    #[test]
    fn test_missing_column_is_noop_with_warning() {
        let original = cols(&["id", "name"]);
        let ops = vec![
            drop("ghost"),
            AlterOperation::RenameColumn {
                old_column_name: "phantom".to_string(),
                new_column_name: "other".to_string(),
            },
        ];
        let applied = apply_operations("users", &original, &ops);
        assert_eq!(applied.columns, original);
        assert_eq!(applied.warnings.len(), 2);
        assert_eq!(
            applied.warnings[0],
            Warning::MissingColumn {
                table: "users".to_string(),
                column: "ghost".to_string(),
                action: "drop".to_string(),
            }
        );
        assert!(matches!(
            &applied.warnings[1],
            Warning::MissingColumn { action, .. } if action == "rename_column"
        ));
    }

    #[test]
    fn test_modify_and_change_missing_column_are_noops() {
        let original = cols(&["id", "name"]);
        let ghost = match add("ghost") {
            AlterOperation::Add(c) => c,
            _ => unreachable!(),
        };
        let ops = vec![
            AlterOperation::Modify(ghost.clone()),
            AlterOperation::Change {
                old_column_name: "phantom".to_string(),
                column: ghost,
            },
        ];
        let applied = apply_operations("users", &original, &ops);
        assert_eq!(applied.columns, original);
        assert_eq!(
            applied.warnings,
            vec![
                Warning::MissingColumn {
                    table: "users".to_string(),
                    column: "ghost".to_string(),
                    action: "modify".to_string(),
                },
                Warning::MissingColumn {
                    table: "users".to_string(),
                    column: "phantom".to_string(),
                    action: "change".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_index_and_constraint_ops_leave_columns() {
        let original = cols(&["id", "email"]);
        let ops = vec![
            AlterOperation::AddIndex {
                index_name: Some("idx_email".to_string()),
                index_columns: cols(&["email"]),
            },
            AlterOperation::DropConstraint {
                constraint_name: "fk".to_string(),
            },
        ];
        assert_eq!(apply_operations("users", &original, &ops).columns, original);
    }

    #[test]
    fn test_schema_state_follows_rename_table() {
        let mut state = SchemaState::new();
        state.seed("clients", cols(&["id", "name"]));

        let warnings = state.apply(&AlterTableDefinition {
            table_name: "clients".to_string(),
            operations: vec![
                add("email"),
                AlterOperation::RenameTable {
                    new_table_name: "customers".to_string(),
                },
            ],
            sql: "ALTER TABLE clients ADD COLUMN email INT, RENAME TO customers".to_string(),
        });

        assert!(warnings.is_empty());
        assert!(!state.contains("clients"));
        assert_eq!(state.columns("customers"), Some(&cols(&["id", "name", "email"])[..]));
    }

    #[test]
    fn test_schema_state_applies_statements_in_sequence() {
        let mut state = SchemaState::new();
        state.seed("orders", cols(&["id", "user_id"]));
        for ops in [vec![add("status")], vec![drop("user_id")]] {
            state.apply(&AlterTableDefinition {
                table_name: "orders".to_string(),
                operations: ops,
                sql: String::new(),
            });
        }
        assert_eq!(state.columns("orders"), Some(&cols(&["id", "status"])[..]));
    }
}
