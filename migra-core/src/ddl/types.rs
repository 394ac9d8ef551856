use serde::Serialize;

/// CREATE TABLE 中的一列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    /// 大写类型名，精度以 `", "` 分隔，例如 `DECIMAL(10, 2)`
    pub column_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    /// 默认值表达式的 SQL 原文，例如 `'0.00'`、`CURRENT_TIMESTAMP`
    pub default: Option<String>,
    pub extra: Option<String>,
}

impl ColumnDefinition {
    pub fn is_auto_increment(&self) -> bool {
        self.extra
            .as_deref()
            .is_some_and(|extra| extra.eq_ignore_ascii_case("AUTO_INCREMENT"))
    }
}

/// 一条 CREATE TABLE 语句的结构化结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    pub table_name: String,
    pub columns: Vec<ColumnDefinition>,
    /// 去掉标识符引号后的规范化 SQL
    pub sql: String,
}

impl TableDefinition {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// `ADD [CONSTRAINT n] FOREIGN KEY ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyConstraint {
    pub constraint_name: Option<String>,
    pub constraint_type: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub referenced_on_delete: Option<String>,
    pub referenced_on_update: Option<String>,
}

/// ALTER TABLE 中的单个动作
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AlterOperation {
    Add(ColumnDefinition),
    Modify(ColumnDefinition),
    Drop {
        column_name: String,
    },
    Change {
        old_column_name: String,
        column: ColumnDefinition,
    },
    RenameColumn {
        old_column_name: String,
        new_column_name: String,
    },
    AddIndex {
        index_name: Option<String>,
        index_columns: Vec<String>,
    },
    DropIndex {
        index_name: String,
    },
    AddConstraint(ForeignKeyConstraint),
    DropConstraint {
        constraint_name: String,
    },
    RenameTable {
        new_table_name: String,
    },
}

impl AlterOperation {
    /// 小写动作标签
    pub fn action(&self) -> &'static str {
        match self {
            AlterOperation::Add(_) => "add",
            AlterOperation::Modify(_) => "modify",
            AlterOperation::Drop { .. } => "drop",
            AlterOperation::Change { .. } => "change",
            AlterOperation::RenameColumn { .. } => "rename_column",
            AlterOperation::AddIndex { .. } => "add_index",
            AlterOperation::DropIndex { .. } => "drop_index",
            AlterOperation::AddConstraint(_) => "add_constraint",
            AlterOperation::DropConstraint { .. } => "drop_constraint",
            AlterOperation::RenameTable { .. } => "rename_table",
        }
    }
}

/// 一条 ALTER TABLE 语句的结构化结果，可包含多个逗号分隔的动作
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterTableDefinition {
    pub table_name: String,
    pub operations: Vec<AlterOperation>,
    pub sql: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoutineType {
    Function,
    Procedure,
}

impl RoutineType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            RoutineType::Function => "FUNCTION",
            RoutineType::Procedure => "PROCEDURE",
        }
    }
}

impl std::fmt::Display for RoutineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineParameter {
    /// IN / OUT / INOUT，未写时为 None
    pub mode: Option<String>,
    pub name: String,
    pub param_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRoutineDefinition {
    pub routine_type: RoutineType,
    pub routine_name: String,
    pub parameters: Vec<RoutineParameter>,
    /// 仅 FUNCTION 有返回类型
    pub return_type: Option<String>,
    pub body: Option<String>,
    /// 去掉 DELIMITER 包装后可直接执行的 CREATE 语句
    pub sql: String,
}
