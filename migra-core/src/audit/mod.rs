//! 审计表
//!
//! 每张业务表 `t` 对应一张只追加的审计表 `ad_t`，由触发器写入。

pub mod adapter;
pub mod table;

pub use adapter::{AdaptedStatement, adapt_statement, adapt_statement_with_warning};
pub use table::generate_audit_table_sql;
