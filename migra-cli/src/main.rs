use clap::Parser;
use migra_cli::{Cli, CliApp, Commands, run_init, setup_logging};
use tracing::error;

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    // `init` 命令不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(force, cli.config.as_deref()) {
            error!("❌ 初始化失败: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let app = match CliApp::new_with_auto_config(cli.config.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            error!("❌ 配置加载失败: {}", e);
            error!("👉 检查配置文件，或运行 'migra init --force' 重新生成");
            std::process::exit(1);
        }
    };

    // 运行命令
    if let Err(e) = app.run(cli.command).await {
        error!("❌ 操作失败: {:#}", e);
        std::process::exit(1);
    }
}
