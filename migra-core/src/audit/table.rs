use tracing::info;

use crate::constants::audit::{FIXED_COLUMNS, audit_table_name};
use crate::ddl::{TableDefinition, render_column_sql};

/// 生成审计表 DDL
///
/// 十个固定审计列在前，业务列按原顺序跟随。业务列不带主键、唯一、外键与
/// 索引；AUTO_INCREMENT 不复制，自增列由 `id_audit` 独占。
pub fn generate_audit_table_sql(definition: &TableDefinition) -> String {
    let audit_table = audit_table_name(&definition.table_name);

    let columns: Vec<String> = FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(
            definition
                .columns
                .iter()
                .map(|c| render_column_sql(c, !c.is_auto_increment())),
        )
        .collect();

    info!(
        "生成审计表 {}，业务列 {} 个",
        audit_table,
        definition.columns.len()
    );

    format!(
        "CREATE TABLE {audit_table} (\n  {}\n);",
        columns.join(",\n  ")
    )
}
