use std::collections::HashSet;

use regex::Regex;
use sqlparser::ast::{Statement, TableConstraint};
use tracing::{debug, info};

use super::columns::{column_from_parts, strip_identifier_quotes, table_name_of};
use super::statements::split_statements;
use super::types::TableDefinition;
use super::parse_single;
use crate::error::Result;

/// 解析 SQL 中的 CREATE TABLE 语句
///
/// 按源顺序每条 CREATE TABLE 产出一个 `TableDefinition`，其他语句跳过。
pub fn parse_create_table_sql(sql: &str) -> Result<Vec<TableDefinition>> {
    let create_table_regex = Regex::new(r"(?i)^\s*CREATE\s+(?:TEMPORARY\s+)?TABLE\b")?;
    let mut tables = Vec::new();

    for statement_sql in split_statements(sql) {
        if !create_table_regex.is_match(&statement_sql) {
            debug!("跳过非 CREATE TABLE 语句: {}", statement_sql);
            continue;
        }

        let (statements, modifiers) = parse_single(&statement_sql)?;
        for statement in statements {
            if let Statement::CreateTable(create_table) = &statement {
                let table_name = table_name_of(&create_table.name);
                debug!("解析表: {}", table_name);

                // 表级 PRIMARY KEY (a, b) 也要反映到列上
                let table_level_pk: HashSet<String> = create_table
                    .constraints
                    .iter()
                    .filter_map(|constraint| match constraint {
                        TableConstraint::PrimaryKey { columns, .. } => Some(columns),
                        _ => None,
                    })
                    .flatten()
                    .map(|ident| ident.value.clone())
                    .collect();

                let columns = create_table
                    .columns
                    .iter()
                    .map(|column| {
                        let options = column.options.iter().map(|o| &o.option);
                        let mut def = column_from_parts(&column.name, &column.data_type, options);
                        if table_level_pk.contains(&def.name) {
                            def.is_primary_key = true;
                        }
                        modifiers.apply_to_column(&mut def);
                        def
                    })
                    .collect();

                tables.push(TableDefinition {
                    table_name,
                    columns,
                    sql: modifiers.restore_sql(&strip_identifier_quotes(&statement.to_string()))?,
                });
            }
        }
    }

    info!("成功解析 {} 个 CREATE TABLE 语句", tables.len());
    Ok(tables)
}
