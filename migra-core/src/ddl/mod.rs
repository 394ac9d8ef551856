//! DDL 解析
//!
//! 以 sqlparser 的 MySQL 方言作为 AST 来源，把 CREATE TABLE / ALTER TABLE
//! 文本转换为结构化定义；存储过程与函数使用正则解析。

pub mod alter;
pub mod columns;
pub mod create;
pub mod modifiers;
pub mod routine;
pub mod sections;
pub mod statements;
pub mod types;

pub use alter::{AlterParseOutput, parse_alter_table_sql, parse_alter_table_sql_with_warnings};
pub use columns::{format_data_type, render_column_sql, strip_identifier_quotes};
pub use create::parse_create_table_sql;
pub use modifiers::NumericModifiers;
pub use routine::parse_create_routine_sql;
pub use sections::{MigrationSections, split_migration_sql};
pub use statements::split_statements;
pub use types::*;

use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use crate::error::{MigraError, Result};

/// 用 MySQL 方言解析单条语句
///
/// sqlparser 不接受的数值修饰符先摘下，随结果一起返回。
pub(crate) fn parse_single(sql: &str) -> Result<(Vec<Statement>, NumericModifiers)> {
    let (parsable, modifiers) = NumericModifiers::strip(sql)?;
    let dialect = MySqlDialect {};
    let statements = Parser::parse_sql(&dialect, &parsable)
        .map_err(|e| MigraError::parse(format!("{e} - 语句: {sql}")))?;
    Ok((statements, modifiers))
}
