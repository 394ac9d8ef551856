use tracing::{debug, info};

use super::{MigrationKind, MigrationPlan};
use crate::assembler::MigrationAssembler;
use crate::audit::adapt_statement_with_warning;
use crate::constants::audit::audit_table_name;
use crate::ddl::{
    AlterOperation, MigrationSections, parse_alter_table_sql_with_warnings,
    split_statements,
};
use crate::error::{MigraError, Result};
use crate::oracle::SchemaOracle;
use crate::schema_state::SchemaState;
use crate::triggers::{generate_triggers, triggers_from_records};
use crate::warning::Warning;

/// 修改已有表的迁移
///
/// 语句按源顺序输出。表的初始列在首次出现时从数据库读取，逐条应用 ALTER
/// 后用最终列重建触发器；DOWN 中恢复数据库里原有的触发器。
pub(super) async fn generate_alter_migration(
    sections: &MigrationSections,
    oracle: &dyn SchemaOracle,
) -> Result<MigrationPlan> {
    let statements = split_statements(&sections.up);
    if statements.is_empty() {
        return Err(MigraError::missing_input("UP 段中没有任何语句"));
    }

    let mut assembler = MigrationAssembler::new();
    let mut warnings = Vec::new();
    let mut state = SchemaState::new();
    let mut touched: Vec<String> = Vec::new();
    let mut renames: Vec<(String, String)> = Vec::new();

    for statement in statements {
        let parsed = parse_alter_table_sql_with_warnings(&statement)?;
        warnings.extend(parsed.warnings);
        if parsed.definitions.is_empty() {
            debug!("非 ALTER TABLE 语句原样保留: {}", statement);
            push_audit_up(&mut assembler, &mut warnings, &statement)?;
            assembler.add_main_up(statement);
            continue;
        }

        for definition in parsed.definitions {
            let table = &definition.table_name;
            if !state.contains(table) {
                let columns = oracle.columns_for_table(table).await?;
                if columns.is_empty() {
                    return Err(MigraError::schema_oracle(format!(
                        "表 {table} 在数据库中不存在或没有任何列"
                    )));
                }
                debug!("表 {} 初始列: {:?}", table, columns);
                state.seed(table.clone(), columns);
                touched.push(table.clone());
            }

            warnings.extend(state.apply(&definition));
            let statement = format!("{};", definition.sql);
            assembler.add_main_up(statement.clone());

            let renamed_to = definition.operations.iter().find_map(|op| match op {
                AlterOperation::RenameTable { new_table_name } => Some(new_table_name.clone()),
                _ => None,
            });
            let adapted = adapt_statement_with_warning(&statement)?;
            match (adapted.statement, &renamed_to) {
                (Some(audit), _) => assembler.add_audit_up(audit),
                (None, Some(new_name)) => assembler.add_audit_up(format!(
                    "RENAME TABLE {} TO {};",
                    audit_table_name(&definition.table_name),
                    audit_table_name(new_name)
                )),
                (None, None) => warnings.extend(adapted.warning),
            }
            if let Some(new_name) = renamed_to {
                renames.push((definition.table_name.clone(), new_name));
            }
        }
    }

    // 触发器按最终表名和最终列重建
    let mut final_tables: Vec<(String, String)> = Vec::new();
    for table in &touched {
        let final_name = resolve_rename(table, &renames);
        if final_tables.iter().any(|(_, name)| *name == final_name) {
            continue;
        }
        let columns = state.columns(&final_name).unwrap_or_default();
        if final_name != *table {
            assembler.add_triggers_up(generate_triggers(table, columns).to_drop_only());
        }
        assembler.add_triggers_up(generate_triggers(&final_name, columns));
        info!("表 {} 的审计触发器已按 {} 列重建", final_name, columns.len());
        final_tables.push((table.clone(), final_name));
    }

    // DOWN：先删除新触发器，再恢复数据库中原有的
    for (original, final_name) in &final_tables {
        if original != final_name {
            let columns = state.columns(final_name).unwrap_or_default();
            assembler.add_triggers_down(generate_triggers(final_name, columns).to_drop_only());
        }
        restore_triggers(&mut assembler, &mut warnings, oracle, original).await?;
    }

    let down_statements = split_statements(&sections.down);
    let mut extra_tables: Vec<String> = Vec::new();
    for statement in &down_statements {
        for definition in parse_alter_table_sql_with_warnings(statement)?.definitions {
            let table = definition.table_name;
            let known = touched.contains(&table)
                || final_tables.iter().any(|(_, name)| *name == table)
                || extra_tables.contains(&table);
            if !known {
                extra_tables.push(table);
            }
        }
    }
    for table in &extra_tables {
        restore_triggers(&mut assembler, &mut warnings, oracle, table).await?;
    }

    for statement in down_statements {
        let adapted = adapt_statement_with_warning(&statement)?;
        match adapted.statement {
            Some(audit) => assembler.add_audit_down(audit),
            None => warnings.extend(adapted.warning),
        }
        assembler.add_main_down(statement);
    }

    Ok(MigrationPlan::new(
        MigrationKind::Alter,
        assembler.build(),
        warnings,
    ))
}

fn push_audit_up(
    assembler: &mut MigrationAssembler,
    warnings: &mut Vec<Warning>,
    statement: &str,
) -> Result<()> {
    let adapted = adapt_statement_with_warning(statement)?;
    match adapted.statement {
        Some(audit) => assembler.add_audit_up(audit),
        None => warnings.extend(adapted.warning),
    }
    Ok(())
}

async fn restore_triggers(
    assembler: &mut MigrationAssembler,
    warnings: &mut Vec<Warning>,
    oracle: &dyn SchemaOracle,
    table: &str,
) -> Result<()> {
    let records = oracle.triggers_for_table(table).await?;
    let restored = triggers_from_records(table, &records);
    warnings.extend(restored.warnings);
    assembler.add_triggers_down(restored.triggers);
    Ok(())
}

/// 沿 RENAME 链找到表的最终名称
fn resolve_rename(table: &str, renames: &[(String, String)]) -> String {
    let mut current = table.to_string();
    for _ in 0..renames.len() {
        match renames.iter().find(|(old, _)| *old == current) {
            Some((_, new)) => current = new.clone(),
            None => break,
        }
    }
    current
}
