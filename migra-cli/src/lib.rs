// 私有模块声明
mod app;
mod cli;
mod commands;
mod init;
pub mod project_info;
mod utils;
pub mod writer;

// 通过 pub use 精确控制对外暴露的接口
pub use app::CliApp;
pub use cli::{Cli, Commands, FormatArg, GenerateArgs, KindArg};
pub use init::run_init;
pub use utils::setup_logging;
