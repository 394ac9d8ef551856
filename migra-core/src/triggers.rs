//! 审计触发器
//!
//! 每张表三个 AFTER 触发器：`<t>_di`（INSERT，操作码 I）、`<t>_da`
//! （UPDATE，操作码 A）、`<t>_de`（DELETE，操作码 E）。

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::constants::audit::audit_table_name;
use crate::constants::triggers::{
    AUDIT_INSERT_COLUMNS, AUDIT_INSERT_VALUES, CONNECTION_INFO_CALL, DELETE_SUFFIX, INSERT_SUFFIX,
    UPDATE_SUFFIX,
};
use crate::oracle::TriggerRecord;
use crate::warning::Warning;

/// 触发器定义；`content` 为空表示只生成 DROP
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerDefinition {
    pub name: String,
    pub content: String,
}

impl TriggerDefinition {
    pub fn drop_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: String::new(),
        }
    }

    pub fn is_drop_only(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// 一张表的三个触发器，总是齐全
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggersResult {
    pub insert_trigger: TriggerDefinition,
    pub update_trigger: TriggerDefinition,
    pub delete_trigger: TriggerDefinition,
}

impl TriggersResult {
    /// 按 insert / update / delete 顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &TriggerDefinition> {
        [&self.insert_trigger, &self.update_trigger, &self.delete_trigger].into_iter()
    }

    /// 同名但只删除不重建的版本
    pub fn to_drop_only(&self) -> Self {
        Self {
            insert_trigger: TriggerDefinition::drop_only(&self.insert_trigger.name),
            update_trigger: TriggerDefinition::drop_only(&self.update_trigger.name),
            delete_trigger: TriggerDefinition::drop_only(&self.delete_trigger.name),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TriggerKind {
    suffix: &'static str,
    event: &'static str,
    op: char,
    prefix: &'static str,
}

const INSERT: TriggerKind = TriggerKind {
    suffix: INSERT_SUFFIX,
    event: "INSERT",
    op: 'I',
    prefix: "NEW",
};

const UPDATE: TriggerKind = TriggerKind {
    suffix: UPDATE_SUFFIX,
    event: "UPDATE",
    op: 'A',
    prefix: "NEW",
};

const DELETE: TriggerKind = TriggerKind {
    suffix: DELETE_SUFFIX,
    event: "DELETE",
    op: 'E',
    prefix: "OLD",
};

pub fn trigger_name(table: &str, suffix: &str) -> String {
    format!("{table}{suffix}")
}

/// 根据当前列生成三个审计触发器
///
/// INSERT 列表中业务列的顺序与 `columns` 完全一致。
pub fn generate_triggers(table: &str, columns: &[String]) -> TriggersResult {
    info!("生成表 {} 的审计触发器，列 {} 个", table, columns.len());
    TriggersResult {
        insert_trigger: build_trigger(table, columns, INSERT),
        update_trigger: build_trigger(table, columns, UPDATE),
        delete_trigger: build_trigger(table, columns, DELETE),
    }
}

fn build_trigger(table: &str, columns: &[String], kind: TriggerKind) -> TriggerDefinition {
    let name = trigger_name(table, kind.suffix);
    let mut insert_columns = AUDIT_INSERT_COLUMNS.to_string();
    let mut insert_values = format!("'{}', {}", kind.op, AUDIT_INSERT_VALUES);
    for column in columns {
        insert_columns.push_str(", ");
        insert_columns.push_str(column);
        insert_values.push_str(&format!(", {}.{}", kind.prefix, column));
    }

    let content = format!(
        "CREATE TRIGGER {name}\nAFTER {event} ON {table} FOR EACH ROW\nBEGIN\n  {call}\n  INSERT INTO {audit} ({insert_columns})\n  VALUES({insert_values});\nEND;",
        event = kind.event,
        call = CONNECTION_INFO_CALL,
        audit = audit_table_name(table),
    );

    TriggerDefinition { name, content }
}

/// 从数据库现有触发器恢复 `TriggersResult`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredTriggers {
    pub triggers: TriggersResult,
    pub warnings: Vec<Warning>,
}

/// 按名称后缀匹配数据库中的触发器
///
/// 缺失的后缀生成只删除的定义并附带 `Warning::MissingTrigger`；只有
/// `BEGIN ... END` 主体的记录会补全为完整的 CREATE TRIGGER 语句。
pub fn triggers_from_records(table: &str, records: &[TriggerRecord]) -> RestoredTriggers {
    let mut warnings = Vec::new();
    let mut restore = |kind: TriggerKind| {
        let expected = trigger_name(table, kind.suffix);
        match records.iter().find(|r| r.trigger.ends_with(kind.suffix)) {
            Some(record) => {
                debug!("恢复触发器 {}", record.trigger);
                TriggerDefinition {
                    name: record.trigger.clone(),
                    content: full_trigger_statement(record, kind),
                }
            }
            None => {
                let warning = Warning::MissingTrigger {
                    table: table.to_string(),
                    trigger: expected.clone(),
                };
                warn!("{}", warning);
                warnings.push(warning);
                TriggerDefinition::drop_only(expected)
            }
        }
    };

    let triggers = TriggersResult {
        insert_trigger: restore(INSERT),
        update_trigger: restore(UPDATE),
        delete_trigger: restore(DELETE),
    };

    RestoredTriggers { triggers, warnings }
}

fn full_trigger_statement(record: &TriggerRecord, kind: TriggerKind) -> String {
    let statement = record.statement.trim().trim_end_matches(';').trim_end();
    let is_complete = statement
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("CREATE"));
    if is_complete {
        return format!("{statement};");
    }

    let timing = if record.timing.trim().is_empty() {
        "AFTER".to_string()
    } else {
        record.timing.trim().to_uppercase()
    };
    let event = if record.event.trim().is_empty() {
        kind.event.to_string()
    } else {
        record.event.trim().to_uppercase()
    };

    format!(
        "CREATE TRIGGER {}\n{timing} {event} ON {} FOR EACH ROW\n{statement};",
        record.trigger, record.table
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn record(name: &str, event: &str, statement: &str) -> TriggerRecord {
        TriggerRecord {
            trigger: name.to_string(),
            event: event.to_string(),
            table: "users".to_string(),
            statement: statement.to_string(),
            timing: "AFTER".to_string(),
            created: None,
        }
    }

    #[test]
    fn test_generate_triggers_names_and_events() {
        let triggers = generate_triggers("users", &cols(&["id", "name"]));
        assert_eq!(triggers.insert_trigger.name, "users_di");
        assert_eq!(triggers.update_trigger.name, "users_da");
        assert_eq!(triggers.delete_trigger.name, "users_de");

        assert!(triggers.insert_trigger.content.contains("AFTER INSERT ON users FOR EACH ROW"));
        assert!(triggers.update_trigger.content.contains("AFTER UPDATE ON users FOR EACH ROW"));
        assert!(triggers.delete_trigger.content.contains("AFTER DELETE ON users FOR EACH ROW"));

        assert!(triggers.insert_trigger.content.contains("VALUES('I', "));
        assert!(triggers.update_trigger.content.contains("VALUES('A', "));
        assert!(triggers.delete_trigger.content.contains("VALUES('E', "));
        assert!(triggers.update_trigger.content.contains("NEW.id, NEW.name);"));
        assert!(triggers.delete_trigger.content.contains("OLD.id, OLD.name);"));
    }

    #[test]
    fn test_generate_insert_trigger_full_text() {
        let triggers = generate_triggers("users", &cols(&["id", "name"]));
        let expected = "CREATE TRIGGER users_di
AFTER INSERT ON users FOR EACH ROW
BEGIN
  CALL getConnectionInfo(@cnn_usuario, @cnn_plataforma, @cnn_ip_reverso, @cnn_sistema_operacional, @cnn_requisicao_id);
  INSERT INTO ad_users (oper, data_audit, hora_audit, usuario, plataforma, ip_reverso, sistema_operacional, requisicao_id, id, name)
  VALUES('I', CURRENT_DATE, CURRENT_TIME, @cnn_usuario, @cnn_plataforma, @cnn_ip_reverso, @cnn_sistema_operacional, @cnn_requisicao_id, NEW.id, NEW.name);
END;";
        assert_eq!(triggers.insert_trigger.content, expected);
    }

    #[test]
    fn test_trigger_value_list_parity() {
        let columns = cols(&["b", "a", "c", "z"]);
        let triggers = generate_triggers("t", &columns);
        let content = &triggers.insert_trigger.content;

        let values_start = content.find("VALUES(").unwrap() + "VALUES(".len();
        let values_end = content.rfind(");").unwrap();
        let values: Vec<&str> = content[values_start..values_end].split(", ").collect();

        assert_eq!(values.len(), 8 + columns.len());
        let expected_tail: Vec<String> = columns.iter().map(|c| format!("NEW.{c}")).collect();
        assert_eq!(values[8..].to_vec(), expected_tail);
    }

    #[test]
    fn test_triggers_from_records_wraps_bare_body() {
        let records = vec![
            record("users_de", "DELETE", "BEGIN\n  INSERT INTO ad_users (id) VALUES (OLD.id);\nEND"),
            record("users_di", "INSERT", "BEGIN INSERT INTO ad_users (id) VALUES (NEW.id); END"),
            record("users_da", "UPDATE", "CREATE TRIGGER users_da AFTER UPDATE ON users FOR EACH ROW BEGIN END;"),
        ];

        let restored = triggers_from_records("users", &records);
        assert!(restored.warnings.is_empty());
        assert_eq!(restored.triggers.insert_trigger.name, "users_di");
        assert_eq!(
            restored.triggers.insert_trigger.content,
            "CREATE TRIGGER users_di\nAFTER INSERT ON users FOR EACH ROW\nBEGIN INSERT INTO ad_users (id) VALUES (NEW.id); END;"
        );
        assert_eq!(
            restored.triggers.update_trigger.content,
            "CREATE TRIGGER users_da AFTER UPDATE ON users FOR EACH ROW BEGIN END;"
        );
        assert!(restored.triggers.delete_trigger.content.starts_with("CREATE TRIGGER users_de\nAFTER DELETE ON users"));
    }

    #[test]
    fn test_triggers_from_records_missing_suffix() {
        let records = vec![record("users_di", "INSERT", "BEGIN END")];
        let restored = triggers_from_records("users", &records);

        assert!(!restored.triggers.insert_trigger.is_drop_only());
        assert!(restored.triggers.update_trigger.is_drop_only());
        assert_eq!(restored.triggers.update_trigger.name, "users_da");
        assert!(restored.triggers.delete_trigger.is_drop_only());
        assert_eq!(restored.warnings.len(), 2);
        assert_eq!(
            restored.warnings[0],
            Warning::MissingTrigger {
                table: "users".to_string(),
                trigger: "users_da".to_string(),
            }
        );
    }

    #[test]
    fn test_to_drop_only_keeps_names() {
        let dropped = generate_triggers("orders", &cols(&["id"])).to_drop_only();
        let names: Vec<&str> = dropped.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["orders_di", "orders_da", "orders_de"]);
        assert!(dropped.iter().all(TriggerDefinition::is_drop_only));
    }
}
