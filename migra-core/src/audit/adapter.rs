use std::sync::LazyLock;

use regex::Regex;
use sqlparser::ast::{AlterTableOperation, ObjectName, ObjectNamePart, ObjectType, Statement};
use tracing::{debug, warn};

use crate::constants::audit::{REJECTED_KEYWORDS, audit_table_name};
use crate::ddl::{parse_single, strip_identifier_quotes};
use crate::error::{MigraError, Result};
use crate::warning::Warning;

/// 约束/索引/引擎关键字，不区分大小写，出现在任何位置都拒绝
static REJECTED: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let keywords = REJECTED_KEYWORDS
        .iter()
        .map(|k| k.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{keywords})")).ok()
});

static ALTER_TABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^ALTER\s+TABLE\s+`?(\w+)`?").ok());
static COLUMN_CLAUSE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:ADD|MODIFY|DROP)\s+COLUMN\b").ok());
static DROP_TABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^DROP\s+TABLE\s+(IF\s+EXISTS\s+)?`?(\w+)`?").ok());
static RENAME_TABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^RENAME\s+TABLE\s+`?(\w+)`?\s+TO\s+`?(\w+)`?").ok());

fn compiled(regex: &'static LazyLock<Option<Regex>>) -> Result<&'static Regex> {
    regex
        .as_ref()
        .ok_or_else(|| MigraError::custom("审计适配正则表达式编译失败"))
}

/// 审计适配结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdaptedStatement {
    /// 针对审计表的等价语句
    pub statement: Option<String>,
    /// 语句形状不受支持时的警告；因约束/索引关键字被过滤时为空
    pub warning: Option<Warning>,
}

/// 把主表语句改写为审计表语句，无审计意义时返回 `None`
pub fn adapt_statement(statement: &str) -> Result<Option<String>> {
    Ok(adapt_statement_with_warning(statement)?.statement)
}

/// 同 [`adapt_statement`]，并返回不支持语句的警告
pub fn adapt_statement_with_warning(statement: &str) -> Result<AdaptedStatement> {
    let body = statement.trim().trim_end_matches(';').trim_end();
    if body.is_empty() {
        return Ok(AdaptedStatement::default());
    }

    if compiled(&REJECTED)?.is_match(body) {
        debug!("语句包含约束/索引/引擎关键字，审计表忽略: {}", body);
        return Ok(AdaptedStatement::default());
    }

    let adapted = match parse_single(body) {
        Ok((mut statements, modifiers)) if statements.len() == 1 => {
            if rewrite_statement(&mut statements[0]) {
                Some(modifiers.restore_sql(&strip_identifier_quotes(&statements[0].to_string()))?)
            } else {
                None
            }
        }
        _ => {
            debug!("sqlparser 无法完整解析，改用文本替换: {}", body);
            rewrite_text(body)?
        }
    };

    Ok(match adapted {
        Some(sql) => AdaptedStatement {
            statement: Some(format!("{sql};")),
            warning: None,
        },
        None => {
            let warning = Warning::UnsupportedStatement {
                statement: format!("{body};"),
            };
            warn!("{}", warning);
            AdaptedStatement {
                statement: None,
                warning: Some(warning),
            }
        }
    })
}

fn prefix_table_name(name: &mut ObjectName) {
    if let Some(ObjectNamePart::Identifier(ident)) = name.0.last_mut() {
        ident.value = audit_table_name(&ident.value);
    }
}

/// 在 AST 上把表名节点替换为 `ad_` 前缀形式，返回是否支持该语句
fn rewrite_statement(statement: &mut Statement) -> bool {
    match statement {
        Statement::AlterTable {
            name, operations, ..
        } => {
            let touches_columns = operations.iter().any(|op| {
                matches!(
                    op,
                    AlterTableOperation::AddColumn { .. }
                        | AlterTableOperation::ModifyColumn { .. }
                        | AlterTableOperation::DropColumn { .. }
                )
            });
            if touches_columns {
                prefix_table_name(name);
                for op in operations.iter_mut() {
                    if let AlterTableOperation::RenameTable { table_name } = op {
                        prefix_table_name(table_name);
                    }
                }
            }
            touches_columns
        }
        Statement::Drop {
            object_type: ObjectType::Table,
            names,
            ..
        } => {
            names.iter_mut().for_each(prefix_table_name);
            true
        }
        Statement::RenameTable(renames) => {
            // 新旧表名都加前缀，避免审计表改名后与业务表重名
            for rename in renames.iter_mut() {
                prefix_table_name(&mut rename.old_name);
                prefix_table_name(&mut rename.new_name);
            }
            true
        }
        _ => false,
    }
}

/// sqlparser 无法解析时的文本替换
fn rewrite_text(body: &str) -> Result<Option<String>> {
    let alter_regex = compiled(&ALTER_TABLE)?;
    let column_clause = compiled(&COLUMN_CLAUSE)?;
    let drop_regex = compiled(&DROP_TABLE)?;
    let rename_regex = compiled(&RENAME_TABLE)?;

    if let Some(captures) = alter_regex.captures(body) {
        if !column_clause.is_match(body) {
            return Ok(None);
        }
        let table = &captures[1];
        let whole_word = Regex::new(&format!(r"\b{}\b", regex::escape(table)))?;
        let replaced = whole_word.replace_all(body, audit_table_name(table).as_str());
        return Ok(Some(strip_identifier_quotes(&replaced)));
    }

    if let Some(captures) = drop_regex.captures(body) {
        let if_exists = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let replaced = drop_regex.replace(body, format!("DROP TABLE {if_exists}{}", audit_table_name(&captures[2])));
        return Ok(Some(strip_identifier_quotes(&replaced)));
    }

    if let Some(captures) = rename_regex.captures(body) {
        let replaced = rename_regex.replace(
            body,
            format!(
                "RENAME TABLE {} TO {}",
                audit_table_name(&captures[1]),
                audit_table_name(&captures[2])
            ),
        );
        return Ok(Some(strip_identifier_quotes(&replaced)));
    }

    Ok(None)
}
