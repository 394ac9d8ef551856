use anyhow::Context;
use migra_core::migration::{
    MigrationGenerator, MigrationKind, MigrationPlan, default_migration_name,
    validate_migration_name,
};
use migra_core::oracle::MySqlSchemaOracle;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::app::CliApp;
use crate::cli::GenerateArgs;
use crate::writer;

/// --dry-run 输出
#[derive(Serialize)]
struct DryRunOutput<'a> {
    name: &'a str,
    #[serde(flatten)]
    plan: &'a MigrationPlan,
}

/// 生成迁移：读取 SQL → 生成完整计划 → 写文件
///
/// 计划在写文件之前全部生成，任何错误都不会留下半成品文件。
pub async fn run_generate(app: &CliApp, args: GenerateArgs) -> anyhow::Result<()> {
    let kind = MigrationKind::from(args.kind);
    let name = args.name.clone().unwrap_or_else(default_migration_name);
    validate_migration_name(&name)?;
    info!("📝 生成 {} 迁移: {}", kind, name);

    let content = match &args.file {
        Some(file) => Some(read_sql_file(app, file)?),
        None => None,
    };

    let oracle = match kind {
        MigrationKind::Alter => Some(connect_oracle(app, args.database_url.as_deref()).await?),
        _ => None,
    };
    let generator = match &oracle {
        Some(oracle) => MigrationGenerator::with_oracle(oracle),
        None => MigrationGenerator::new(),
    };

    let plan = generator
        .generate(kind, content.as_deref())
        .await
        .with_context(|| format!("生成 {kind} 迁移失败"))?;

    if !plan.warnings.is_empty() {
        warn!("⚠️  生成过程中有 {} 个警告，请检查迁移内容", plan.warnings.len());
    }

    if args.dry_run {
        let output = DryRunOutput {
            name: &name,
            plan: &plan,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let format = args.format.map(Into::into).unwrap_or(app.config.output.format);
    let output_dir = args.output.clone().unwrap_or_else(|| app.config.output_dir());
    let timestamp = writer::migration_timestamp();
    let paths = writer::write_migration(&output_dir, format, &name, timestamp, &plan)?;
    for path in paths {
        info!("✅ 迁移文件已生成: {}", path.display());
    }
    Ok(())
}

fn read_sql_file(app: &CliApp, file: &Path) -> anyhow::Result<String> {
    let path = app.config.resolve_sql_file(file)?;
    info!("读取 SQL 文件: {}", path.display());
    std::fs::read_to_string(&path)
        .with_context(|| format!("读取 SQL 文件失败: {}", path.display()))
}

/// 连接串优先：--database-url / MIGRA_DATABASE_URL，其次配置文件 [database]
async fn connect_oracle(app: &CliApp, database_url: Option<&str>) -> anyhow::Result<MySqlSchemaOracle> {
    if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
        return MySqlSchemaOracle::connect(url)
            .await
            .context("连接数据库失败（--database-url）");
    }
    if let Some(database) = &app.config.database {
        return MySqlSchemaOracle::connect_with_config(database)
            .await
            .with_context(|| {
                format!(
                    "连接数据库失败: {}:{}/{}",
                    database.host, database.port, database.database
                )
            });
    }
    anyhow::bail!(
        "alter 迁移需要数据库连接：使用 --database-url、环境变量 MIGRA_DATABASE_URL 或配置文件 [database] 段"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{FormatArg, KindArg};
    use migra_core::config::AppConfig;
    use tempfile::tempdir;

    fn args(kind: KindArg) -> GenerateArgs {
        GenerateArgs {
            kind,
            file: None,
            name: Some("AddProducts".to_string()),
            output: None,
            format: None,
            database_url: None,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn test_generate_create_writes_sql_files() {
        let dir = tempdir().unwrap();
        let sql_path = dir.path().join("products.sql");
        std::fs::write(
            &sql_path,
            "-- #UP\nCREATE TABLE products (id INT PRIMARY KEY, name VARCHAR(100));\n-- #DOWN\nDROP TABLE products;\n",
        )
        .unwrap();
        let out_dir = dir.path().join("migrations");

        let app = CliApp::with_config(AppConfig::default());
        let mut generate = args(KindArg::Create);
        generate.file = Some(sql_path);
        generate.output = Some(out_dir.clone());
        generate.format = Some(FormatArg::Sql);

        run_generate(&app, generate).await.unwrap();

        let mut files: Vec<String> = std::fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        files.sort();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("_AddProducts.down.sql"));
        assert!(files[1].ends_with("_AddProducts.up.sql"));

        let up = std::fs::read_to_string(out_dir.join(&files[1])).unwrap();
        assert!(up.contains("CREATE TABLE ad_products"));
    }

    #[tokio::test]
    async fn test_generate_rejects_short_name() {
        let app = CliApp::with_config(AppConfig::default());
        let mut generate = args(KindArg::Raw);
        generate.name = Some("ab".to_string());
        assert!(run_generate(&app, generate).await.is_err());
    }

    #[tokio::test]
    async fn test_generate_alter_without_database_fails_before_writing() {
        let dir = tempdir().unwrap();
        let sql_path = dir.path().join("alter.sql");
        std::fs::write(&sql_path, "ALTER TABLE users ADD COLUMN age INT;").unwrap();
        let out_dir = dir.path().join("migrations");

        let app = CliApp::with_config(AppConfig::default());
        let mut generate = args(KindArg::Alter);
        generate.file = Some(sql_path);
        generate.output = Some(out_dir.clone());

        let err = run_generate(&app, generate).await.unwrap_err();
        assert!(err.to_string().contains("数据库连接"));
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_generate_missing_file_fails() {
        let app = CliApp::with_config(AppConfig::default());
        let mut generate = args(KindArg::Create);
        generate.file = Some("definitely/not/here.sql".into());
        assert!(run_generate(&app, generate).await.is_err());
    }
}
