use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::types::ColumnDefinition;
use crate::error::{MigraError, Result};

/// 小数/浮点类型族，sqlparser 不接受其后的 UNSIGNED / ZEROFILL
const FRACTIONAL_TYPES: &str = r"DECIMAL|NUMERIC|DEC|FIXED|FLOAT|DOUBLE(?:\s+PRECISION)?|REAL";

static TRAILING_MODIFIERS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(`?(\w+)`?\s+(?:{FRACTIONAL_TYPES})\b(?:\s*\([^)]*\))?)((?:\s+(?:UNSIGNED|ZEROFILL)\b)+)"
    ))
    .ok()
});

/// 解析前摘掉的数值修饰符，按列名记录，解析后再补回
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericModifiers {
    columns: Vec<(String, String)>,
}

impl NumericModifiers {
    /// 摘掉 `DECIMAL(10,2) UNSIGNED` 之类的修饰符，返回可解析的 SQL
    pub fn strip(sql: &str) -> Result<(String, Self)> {
        let regex = TRAILING_MODIFIERS
            .as_ref()
            .ok_or_else(|| MigraError::custom("数值修饰符正则表达式编译失败"))?;

        let mut modifiers = Self::default();
        let stripped = regex.replace_all(sql, |caps: &Captures| {
            let words = caps[3]
                .split_whitespace()
                .map(str::to_uppercase)
                .collect::<Vec<_>>()
                .join(" ");
            debug!("列 {} 的修饰符 {} 在解析后补回", &caps[2], words);
            modifiers.columns.push((caps[2].to_string(), words));
            caps[1].to_string()
        });
        Ok((stripped.into_owned(), modifiers))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn for_column(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, words)| words.as_str())
    }

    /// 把修饰符补回列类型
    pub fn apply_to_column(&self, column: &mut ColumnDefinition) {
        if let Some(words) = self.for_column(&column.name) {
            column.column_type = format!("{} {words}", column.column_type);
        }
    }

    /// 把修饰符补回规范化后的 SQL 文本
    pub fn restore_sql(&self, sql: &str) -> Result<String> {
        let mut restored = sql.to_string();
        for (column, words) in &self.columns {
            let regex = Regex::new(&format!(
                r"(?i)(\b{}\s+(?:{FRACTIONAL_TYPES})\b(?:\s*\([^)]*\))?)",
                regex::escape(column)
            ))?;
            restored = regex
                .replace(&restored, |caps: &Captures| format!("{} {words}", &caps[1]))
                .into_owned();
        }
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_and_restore() {
        let sql = "ALTER TABLE t MODIFY COLUMN `price` decimal(10,2) unsigned zerofill, ADD COLUMN qty INT UNSIGNED";
        let (stripped, modifiers) = NumericModifiers::strip(sql).unwrap();
        assert_eq!(
            stripped,
            "ALTER TABLE t MODIFY COLUMN `price` decimal(10,2), ADD COLUMN qty INT UNSIGNED"
        );
        assert_eq!(modifiers.for_column("price"), Some("UNSIGNED ZEROFILL"));
        assert_eq!(modifiers.for_column("qty"), None);

        let restored = modifiers
            .restore_sql("ALTER TABLE t MODIFY COLUMN price DECIMAL(10,2), ADD COLUMN qty INT UNSIGNED")
            .unwrap();
        assert_eq!(
            restored,
            "ALTER TABLE t MODIFY COLUMN price DECIMAL(10,2) UNSIGNED ZEROFILL, ADD COLUMN qty INT UNSIGNED"
        );
    }

    #[test]
    fn test_strip_leaves_plain_sql() {
        let (stripped, modifiers) = NumericModifiers::strip("CREATE TABLE t (id BIGINT(20) UNSIGNED)").unwrap();
        assert_eq!(stripped, "CREATE TABLE t (id BIGINT(20) UNSIGNED)");
        assert!(modifiers.is_empty());
    }
}
