use migra_core::{config::AppConfig, error::Result};
use std::path::{Path, PathBuf};

use crate::cli::Commands;
use crate::{commands, init};

#[derive(Debug, Clone)]
pub struct CliApp {
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
}

impl CliApp {
    /// 使用智能配置查找初始化CLI应用
    pub fn new_with_auto_config(config_path: Option<&Path>) -> Result<Self> {
        let config = AppConfig::find_and_load_config(config_path)?;
        Ok(Self {
            config,
            config_path: config_path.map(Path::to_path_buf),
        })
    }

    /// 使用已加载的配置初始化
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// 运行应用命令
    pub async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Init { force } => init::run_init(force, self.config_path.as_deref()),
            Commands::Generate(args) => commands::run_generate(self, args).await,
        }
    }
}
