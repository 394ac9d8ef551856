use tracing::info;

use super::{MigrationKind, MigrationPlan};
use crate::assembler::MigrationAssembler;
use crate::ddl::{MigrationSections, parse_create_routine_sql, split_statements};
use crate::error::{MigraError, Result};

/// 存储过程 / 函数迁移：UP 先删除同名对象再创建
pub(super) fn generate_routine_migration(sections: &MigrationSections) -> Result<MigrationPlan> {
    let routine = parse_create_routine_sql(&sections.up)?.ok_or_else(|| {
        MigraError::missing_input("UP 段中没有找到 CREATE FUNCTION / PROCEDURE 定义")
    })?;
    info!("生成 {} {} 的迁移", routine.routine_type, routine.routine_name);

    let mut assembler = MigrationAssembler::new();
    assembler.add_routine(routine);
    for statement in split_statements(&sections.down) {
        assembler.add_main_down(statement);
    }

    Ok(MigrationPlan::new(
        MigrationKind::Routine,
        assembler.build(),
        Vec::new(),
    ))
}
