use regex::Regex;
use sqlparser::ast::{AlterTableOperation, Ident, Statement, TableConstraint};
use tracing::{debug, info, warn};

use super::columns::{column_from_parts, strip_identifier_quotes, table_name_of};
use super::parse_single;
use super::statements::split_statements;
use super::types::{AlterOperation, AlterTableDefinition, ForeignKeyConstraint};
use crate::error::Result;
use crate::warning::Warning;

/// ALTER TABLE 解析结果，附带被跳过子句的警告
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterParseOutput {
    pub definitions: Vec<AlterTableDefinition>,
    pub warnings: Vec<Warning>,
}

/// 解析 SQL 中的 ALTER TABLE 语句
pub fn parse_alter_table_sql(sql: &str) -> Result<Vec<AlterTableDefinition>> {
    Ok(parse_alter_table_sql_with_warnings(sql)?.definitions)
}

/// 解析 ALTER TABLE 语句，并收集不受支持子句的警告
pub fn parse_alter_table_sql_with_warnings(sql: &str) -> Result<AlterParseOutput> {
    let alter_table_regex = Regex::new(r"(?i)^\s*ALTER\s+(?:ONLINE\s+|IGNORE\s+)?TABLE\b")?;
    let mut output = AlterParseOutput::default();

    for statement_sql in split_statements(sql) {
        if !alter_table_regex.is_match(&statement_sql) {
            debug!("跳过非 ALTER TABLE 语句: {}", statement_sql);
            continue;
        }

        let (statements, modifiers) = parse_single(&statement_sql)?;
        for statement in statements {
            if let Statement::AlterTable {
                name, operations, ..
            } = &statement
            {
                let table_name = table_name_of(name);
                let mut converted = Vec::with_capacity(operations.len());

                for operation in operations {
                    match convert_operation(operation) {
                        Some(mut op) => {
                            if let AlterOperation::Add(column)
                            | AlterOperation::Modify(column)
                            | AlterOperation::Change { column, .. } = &mut op
                            {
                                modifiers.apply_to_column(column);
                            }
                            debug!("表 {} 解析到 {} 操作", table_name, op.action());
                            converted.push(op);
                        }
                        None => {
                            let clause = strip_identifier_quotes(&operation.to_string());
                            let warning = Warning::UnsupportedAlterClause {
                                table: table_name.clone(),
                                clause,
                            };
                            warn!("{}", warning);
                            output.warnings.push(warning);
                        }
                    }
                }

                output.definitions.push(AlterTableDefinition {
                    table_name,
                    operations: converted,
                    sql: modifiers.restore_sql(&strip_identifier_quotes(&statement.to_string()))?,
                });
            }
        }
    }

    info!("成功解析 {} 个 ALTER TABLE 语句", output.definitions.len());
    Ok(output)
}

fn idents_to_names(idents: &[Ident]) -> Vec<String> {
    idents.iter().map(|ident| ident.value.clone()).collect()
}

/// 把 sqlparser 的 ALTER 子句映射为封闭的 `AlterOperation`
fn convert_operation(operation: &AlterTableOperation) -> Option<AlterOperation> {
    let op = match operation {
        AlterTableOperation::AddColumn { column_def, .. } => {
            let options = column_def.options.iter().map(|o| &o.option);
            AlterOperation::Add(column_from_parts(
                &column_def.name,
                &column_def.data_type,
                options,
            ))
        }
        AlterTableOperation::ModifyColumn {
            col_name,
            data_type,
            options,
            ..
        } => AlterOperation::Modify(column_from_parts(col_name, data_type, options)),
        AlterTableOperation::ChangeColumn {
            old_name,
            new_name,
            data_type,
            options,
            ..
        } => AlterOperation::Change {
            old_column_name: old_name.value.clone(),
            column: column_from_parts(new_name, data_type, options),
        },
        AlterTableOperation::DropColumn { column_name, .. } => AlterOperation::Drop {
            column_name: column_name.value.clone(),
        },
        AlterTableOperation::RenameColumn {
            old_column_name,
            new_column_name,
        } => AlterOperation::RenameColumn {
            old_column_name: old_column_name.value.clone(),
            new_column_name: new_column_name.value.clone(),
        },
        AlterTableOperation::RenameTable { table_name } => AlterOperation::RenameTable {
            new_table_name: table_name_of(table_name),
        },
        AlterTableOperation::DropIndex { name } => AlterOperation::DropIndex {
            index_name: name.value.clone(),
        },
        AlterTableOperation::DropConstraint { name, .. }
        | AlterTableOperation::DropForeignKey { name } => AlterOperation::DropConstraint {
            constraint_name: name.value.clone(),
        },
        AlterTableOperation::AddConstraint(constraint) => match constraint {
            TableConstraint::Index { name, columns, .. } => AlterOperation::AddIndex {
                index_name: name.as_ref().map(|n| n.value.clone()),
                index_columns: idents_to_names(columns),
            },
            TableConstraint::Unique {
                name,
                index_name,
                columns,
                ..
            } => AlterOperation::AddIndex {
                index_name: index_name.as_ref().or(name.as_ref()).map(|n| n.value.clone()),
                index_columns: idents_to_names(columns),
            },
            TableConstraint::ForeignKey {
                name,
                columns,
                foreign_table,
                referred_columns,
                on_delete,
                on_update,
                ..
            } => AlterOperation::AddConstraint(ForeignKeyConstraint {
                constraint_name: name.as_ref().map(|n| n.value.clone()),
                constraint_type: "FOREIGN KEY".to_string(),
                columns: idents_to_names(columns),
                referenced_table: table_name_of(foreign_table),
                referenced_columns: idents_to_names(referred_columns),
                referenced_on_delete: on_delete.map(|a| a.to_string().to_uppercase()),
                referenced_on_update: on_update.map(|a| a.to_string().to_uppercase()),
            }),
            _ => return None,
        },
        _ => return None,
    };
    Some(op)
}
