//! 迁移语句装配
//!
//! 各生成步骤把语句放进不同的桶，`build()` 按固定顺序拼出 UP / DOWN。

use serde::Serialize;
use tracing::debug;

use crate::ddl::CreateRoutineDefinition;
use crate::triggers::TriggersResult;

/// 装配完成的 UP / DOWN 语句
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssembledStatements {
    pub up: Vec<String>,
    pub down: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MigrationAssembler {
    custom_sql: Vec<String>,
    routines: Vec<CreateRoutineDefinition>,
    main_up: Vec<String>,
    audit_up: Vec<String>,
    triggers_up: Vec<TriggersResult>,
    triggers_down: Vec<TriggersResult>,
    audit_down: Vec<String>,
    main_down: Vec<String>,
}

impl MigrationAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 原样执行的自定义 SQL，排在最前
    pub fn add_custom_sql(&mut self, statements: impl IntoIterator<Item = String>) {
        self.custom_sql.extend(statements);
    }

    pub fn add_routine(&mut self, routine: CreateRoutineDefinition) {
        self.routines.push(routine);
    }

    pub fn add_main_up(&mut self, statement: impl Into<String>) {
        self.main_up.push(statement.into());
    }

    pub fn add_audit_up(&mut self, statement: impl Into<String>) {
        self.audit_up.push(statement.into());
    }

    pub fn add_triggers_up(&mut self, triggers: TriggersResult) {
        self.triggers_up.push(triggers);
    }

    /// DOWN 中要恢复的触发器；内容为空的只生成 DROP
    pub fn add_triggers_down(&mut self, triggers: TriggersResult) {
        self.triggers_down.push(triggers);
    }

    pub fn add_audit_down(&mut self, statement: impl Into<String>) {
        self.audit_down.push(statement.into());
    }

    pub fn add_main_down(&mut self, statement: impl Into<String>) {
        self.main_down.push(statement.into());
    }

    pub fn build(&self) -> AssembledStatements {
        let mut up = Vec::new();
        up.extend(self.custom_sql.iter().filter_map(|s| terminate(s)));
        for routine in &self.routines {
            up.push(format!(
                "DROP {} IF EXISTS {};",
                routine.routine_type.as_sql(),
                routine.routine_name
            ));
            up.extend(terminate(&routine.sql));
        }
        up.extend(self.main_up.iter().filter_map(|s| terminate(s)));
        up.extend(self.audit_up.iter().filter_map(|s| terminate(s)));
        push_triggers(&mut up, &self.triggers_up);

        let mut down = Vec::new();
        push_triggers(&mut down, &self.triggers_down);
        down.extend(self.audit_down.iter().filter_map(|s| terminate(s)));
        down.extend(self.main_down.iter().filter_map(|s| terminate(s)));

        debug!("装配完成: up {} 条, down {} 条", up.len(), down.len());
        AssembledStatements { up, down }
    }
}

fn push_triggers(out: &mut Vec<String>, triggers: &[TriggersResult]) {
    for trigger in triggers.iter().flat_map(TriggersResult::iter) {
        out.push(format!("DROP TRIGGER IF EXISTS {};", trigger.name));
        if !trigger.is_drop_only() {
            out.push(trigger.content.trim().to_string());
        }
    }
}

/// 去掉首尾空白并补上分号；空语句返回 None
fn terminate(statement: &str) -> Option<String> {
    let trimmed = statement.trim();
    if trimmed.is_empty() || trimmed == ";" {
        return None;
    }
    if trimmed.ends_with(';') {
        Some(trimmed.to_string())
    } else {
        Some(format!("{trimmed};"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::RoutineType;
    use crate::triggers::{TriggerDefinition, generate_triggers};

    fn routine() -> CreateRoutineDefinition {
        CreateRoutineDefinition {
            routine_type: RoutineType::Procedure,
            routine_name: "cleanup".to_string(),
            parameters: Vec::new(),
            return_type: None,
            body: Some("DELETE FROM logs;".to_string()),
            sql: "CREATE PROCEDURE cleanup() BEGIN DELETE FROM logs; END;".to_string(),
        }
    }

    #[test]
    fn test_build_up_order() {
        let mut assembler = MigrationAssembler::new();
        assembler.add_triggers_up(generate_triggers("users", &["id".to_string()]));
        assembler.add_audit_up("ALTER TABLE ad_users ADD COLUMN age INT;");
        assembler.add_main_up("ALTER TABLE users ADD COLUMN age INT");
        assembler.add_routine(routine());
        assembler.add_custom_sql(vec!["SET @x = 1;".to_string()]);

        let built = assembler.build();
        assert_eq!(built.up[0], "SET @x = 1;");
        assert_eq!(built.up[1], "DROP PROCEDURE IF EXISTS cleanup;");
        assert!(built.up[2].starts_with("CREATE PROCEDURE cleanup()"));
        assert_eq!(built.up[3], "ALTER TABLE users ADD COLUMN age INT;");
        assert_eq!(built.up[4], "ALTER TABLE ad_users ADD COLUMN age INT;");
        assert_eq!(built.up[5], "DROP TRIGGER IF EXISTS users_di;");
        assert!(built.up[6].starts_with("CREATE TRIGGER users_di"));
        assert_eq!(built.up[7], "DROP TRIGGER IF EXISTS users_da;");
        assert_eq!(built.up[9], "DROP TRIGGER IF EXISTS users_de;");
        assert_eq!(built.up.len(), 11);
        assert!(built.down.is_empty());
    }

    #[test]
    fn test_build_down_order_and_drop_only_triggers() {
        let mut assembler = MigrationAssembler::new();
        assembler.add_main_down("ALTER TABLE users DROP COLUMN age;");
        assembler.add_audit_down("ALTER TABLE ad_users DROP COLUMN age;");
        let restored = TriggersResult {
            insert_trigger: TriggerDefinition {
                name: "users_di".to_string(),
                content: "CREATE TRIGGER users_di AFTER INSERT ON users FOR EACH ROW BEGIN END;"
                    .to_string(),
            },
            update_trigger: TriggerDefinition::drop_only("users_da"),
            delete_trigger: TriggerDefinition::drop_only("users_de"),
        };
        assembler.add_triggers_down(restored);

        let built = assembler.build();
        assert_eq!(
            built.down,
            vec![
                "DROP TRIGGER IF EXISTS users_di;".to_string(),
                "CREATE TRIGGER users_di AFTER INSERT ON users FOR EACH ROW BEGIN END;".to_string(),
                "DROP TRIGGER IF EXISTS users_da;".to_string(),
                "DROP TRIGGER IF EXISTS users_de;".to_string(),
                "ALTER TABLE ad_users DROP COLUMN age;".to_string(),
                "ALTER TABLE users DROP COLUMN age;".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_statements_are_skipped() {
        let mut assembler = MigrationAssembler::new();
        assembler.add_main_up("   ");
        assembler.add_main_down(";");
        let built = assembler.build();
        assert!(built.up.is_empty());
        assert!(built.down.is_empty());
    }
}
