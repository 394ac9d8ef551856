use sqlparser::ast::{ColumnOption, DataType, Ident, ObjectName};

use super::types::ColumnDefinition;

/// 列定义翻译：sqlparser 的列 AST -> `ColumnDefinition`
pub fn column_from_parts<'a>(
    name: &Ident,
    data_type: &DataType,
    options: impl IntoIterator<Item = &'a ColumnOption>,
) -> ColumnDefinition {
    let mut is_nullable = true;
    let mut is_primary_key = false;
    let mut default = None;
    let mut extra = None;

    for option in options {
        match option {
            ColumnOption::NotNull => is_nullable = false,
            ColumnOption::Null => is_nullable = true,
            ColumnOption::Default(expr) => {
                default = Some(strip_identifier_quotes(&format!("{expr}")));
            }
            ColumnOption::Unique { is_primary, .. } => {
                if *is_primary {
                    is_primary_key = true;
                }
            }
            ColumnOption::DialectSpecific(tokens) => {
                // MySQL 的 AUTO_INCREMENT 以方言 token 的形式出现
                let token_str = tokens
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_uppercase();
                if token_str.contains("AUTO_INCREMENT") {
                    extra = Some("AUTO_INCREMENT".to_string());
                }
            }
            _ => {}
        }
    }

    ColumnDefinition {
        name: name.value.clone(),
        column_type: format_data_type(data_type),
        is_nullable,
        is_primary_key,
        default,
        extra,
    }
}

/// 格式化数据类型
///
/// 类型名大写（引号内的 ENUM 取值保持原样），参数之间统一为 `", "`，
/// 例如 `decimal(10,2) unsigned` -> `DECIMAL(10, 2) UNSIGNED`。
pub fn format_data_type(data_type: &DataType) -> String {
    let raw = strip_identifier_quotes(&data_type.to_string());
    let mut formatted = String::with_capacity(raw.len() + 4);
    let mut quote: Option<char> = None;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                formatted.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    formatted.push(ch);
                }
                ',' => {
                    formatted.push_str(", ");
                    while chars.peek().is_some_and(|c| c.is_whitespace()) {
                        chars.next();
                    }
                }
                c => formatted.extend(c.to_uppercase()),
            },
        }
    }

    formatted
}

/// 去掉引号外的反引号
pub fn strip_identifier_quotes(sql: &str) -> String {
    let mut result = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;

    for ch in sql.chars() {
        match quote {
            Some(q) => {
                result.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '`' => {}
                '\'' | '"' => {
                    quote = Some(ch);
                    result.push(ch);
                }
                c => result.push(c),
            },
        }
    }

    result
}

/// 表名取最后一段（忽略库名前缀与引号）
pub fn table_name_of(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_else(|| strip_identifier_quotes(&name.to_string()))
}

/// 按建表规则渲染一列：`name TYPE [NOT NULL] [DEFAULT d] [extra]`
pub fn render_column_sql(column: &ColumnDefinition, include_extra: bool) -> String {
    let mut parts = vec![column.name.clone(), column.column_type.clone()];
    if !column.is_nullable {
        parts.push("NOT NULL".to_string());
    }
    if let Some(default) = &column.default {
        parts.push(format!("DEFAULT {default}"));
    }
    if include_extra {
        if let Some(extra) = &column.extra {
            parts.push(extra.clone());
        }
    }
    parts.join(" ")
}
