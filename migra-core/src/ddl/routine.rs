use regex::Regex;
use tracing::{debug, info};

use super::statements::split_statements;
use super::types::{CreateRoutineDefinition, RoutineParameter, RoutineType};
use crate::error::{MigraError, Result};

/// 解析 CREATE FUNCTION / CREATE PROCEDURE
///
/// 支持 `DEFINER=...`、IN/OUT/INOUT 参数模式、带括号的参数类型以及
/// `DELIMITER` 包装。输入中没有存储过程或函数时返回 `None`。
pub fn parse_create_routine_sql(sql: &str) -> Result<Option<CreateRoutineDefinition>> {
    let header_regex = Regex::new(
        r"(?is)^CREATE\s+(?:OR\s+REPLACE\s+)?(?:DEFINER\s*=\s*\S+\s+)?(FUNCTION|PROCEDURE)\s+(?:IF\s+NOT\s+EXISTS\s+)?([`\w.]+)\s*\(",
    )?;

    let Some(statement) = split_statements(sql)
        .into_iter()
        .find(|s| header_regex.is_match(s))
    else {
        debug!("未找到 CREATE FUNCTION / PROCEDURE 语句");
        return Ok(None);
    };

    let normalized = collapse_whitespace(&statement);
    let captures = header_regex
        .captures(&normalized)
        .ok_or_else(|| MigraError::parse(format!("无法识别的存储过程定义: {statement}")))?;

    let routine_type = if captures[1].eq_ignore_ascii_case("FUNCTION") {
        RoutineType::Function
    } else {
        RoutineType::Procedure
    };
    let routine_name = captures[2].replace('`', "");

    // 定位参数列表的右括号（类型里可能有括号）
    let params_start = captures.get(0).map(|m| m.end()).unwrap_or_default();
    let params_end = find_closing_paren(&normalized, params_start).ok_or_else(|| {
        MigraError::parse(format!("{routine_type} {routine_name} 的参数列表缺少右括号"))
    })?;
    let parameters = parse_parameters(&normalized[params_start..params_end]);
    let rest = &normalized[params_end + 1..];

    let return_type = match routine_type {
        RoutineType::Function => {
            let returns_regex = Regex::new(
                r"(?is)^\s*RETURNS\s+(.+?)(?:\s+(?:NOT\s+DETERMINISTIC|DETERMINISTIC|READS|MODIFIES|NO\s+SQL|CONTAINS|LANGUAGE|SQL\s+SECURITY|COMMENT|BEGIN|RETURN)\b|\s*;?\s*$)",
            )?;
            returns_regex
                .captures(rest)
                .map(|c| c[1].trim().to_string())
        }
        RoutineType::Procedure => None,
    };

    let body_regex = Regex::new(r"(?is)\bBEGIN\b\s*(.*?)\s*\bEND\b\s*;?\s*$")?;
    let body = body_regex
        .captures(rest)
        .map(|c| c[1].trim().to_string())
        .filter(|b| !b.is_empty());

    info!(
        "解析到 {} {}，参数 {} 个",
        routine_type,
        routine_name,
        parameters.len()
    );

    Ok(Some(CreateRoutineDefinition {
        routine_type,
        routine_name,
        parameters,
        return_type,
        body,
        sql: statement,
    }))
}

fn collapse_whitespace(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_closing_paren(text: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, ch) in text[from..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// 按顶层逗号切分参数，`DECIMAL(10, 2)` 里的逗号不会切断参数
fn parse_parameters(raw: &str) -> Vec<RoutineParameter> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in raw.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => pieces.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    pieces.push(current);

    pieces
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .filter_map(|p| {
            let mut words = p.split_whitespace();
            let first = words.next()?;
            let (mode, name) = if ["IN", "OUT", "INOUT"]
                .iter()
                .any(|m| first.eq_ignore_ascii_case(m))
            {
                (Some(first.to_uppercase()), words.next()?)
            } else {
                (None, first)
            };
            Some(RoutineParameter {
                mode,
                name: name.replace('`', ""),
                param_type: words.collect::<Vec<_>>().join(" "),
            })
        })
        .collect()
}
