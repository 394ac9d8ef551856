pub mod assembler;
pub mod audit;
pub mod config;
pub mod constants;
pub mod ddl;
pub mod error;
pub mod migration;
pub mod oracle;
pub mod schema_state;
pub mod triggers;
pub mod warning;

pub use error::{MigraError, Result};
