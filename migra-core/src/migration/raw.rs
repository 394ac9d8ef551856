use super::{MigrationKind, MigrationPlan};
use crate::assembler::{AssembledStatements, MigrationAssembler};
use crate::ddl::{MigrationSections, split_statements};

/// 原样执行的 SQL 迁移
pub(super) fn generate_raw_migration(sections: &MigrationSections) -> MigrationPlan {
    let mut assembler = MigrationAssembler::new();
    assembler.add_custom_sql(split_statements(&sections.up));
    for statement in split_statements(&sections.down) {
        assembler.add_main_down(statement);
    }
    MigrationPlan::new(MigrationKind::Raw, assembler.build(), Vec::new())
}

/// 没有输入文件时的空迁移骨架
pub(super) fn empty_migration() -> MigrationPlan {
    MigrationPlan::new(MigrationKind::Raw, AssembledStatements::default(), Vec::new())
}
