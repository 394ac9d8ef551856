use tracing::{debug, info};

use super::{MigrationKind, MigrationPlan};
use crate::assembler::MigrationAssembler;
use crate::audit::generate_audit_table_sql;
use crate::constants::audit::audit_table_name;
use crate::ddl::{MigrationSections, parse_create_table_sql, split_statements};
use crate::error::{MigraError, Result};
use crate::triggers::generate_triggers;

/// 新建表迁移
///
/// UP 中每条 CREATE TABLE 生成主表、审计表和三个触发器；其他语句原样
/// 保留在主表语句中。DOWN 在用户语句前先删除触发器和审计表。
pub(super) fn generate_create_migration(sections: &MigrationSections) -> Result<MigrationPlan> {
    let mut assembler = MigrationAssembler::new();
    let mut tables = Vec::new();

    for statement in split_statements(&sections.up) {
        let definitions = parse_create_table_sql(&statement)?;
        if definitions.is_empty() {
            debug!("非 CREATE TABLE 语句原样保留: {}", statement);
            assembler.add_main_up(statement);
            continue;
        }

        for definition in definitions {
            assembler.add_main_up(format!("{};", definition.sql));
            assembler.add_audit_up(generate_audit_table_sql(&definition));
            assembler.add_triggers_up(generate_triggers(
                &definition.table_name,
                &definition.column_names(),
            ));
            info!(
                "表 {} 生成审计表 {}",
                definition.table_name,
                audit_table_name(&definition.table_name)
            );
            tables.push(definition);
        }
    }

    if tables.is_empty() {
        return Err(MigraError::missing_input("UP 段中没有 CREATE TABLE 语句"));
    }

    for table in &tables {
        assembler.add_triggers_down(
            generate_triggers(&table.table_name, &table.column_names()).to_drop_only(),
        );
        assembler.add_audit_down(format!(
            "DROP TABLE IF EXISTS {};",
            audit_table_name(&table.table_name)
        ));
    }
    for statement in split_statements(&sections.down) {
        assembler.add_main_down(statement);
    }

    Ok(MigrationPlan::new(
        MigrationKind::Create,
        assembler.build(),
        Vec::new(),
    ))
}
