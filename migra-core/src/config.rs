use crate::constants::config;
use crate::error::{MigraError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sql: SqlConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// 迁移文件输出配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    pub dir: String,
    #[serde(default)]
    pub format: OutputFormat,
}

/// SQL 输入配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SqlConfig {
    pub files_dir: String,
}

/// 元数据数据库连接配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
}

fn default_port() -> u16 {
    config::DEFAULT_MYSQL_PORT
}

/// 迁移文件格式
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Typeorm,
    Sql,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Typeorm => write!(f, "typeorm"),
            OutputFormat::Sql => write!(f, "sql"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = MigraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typeorm" => Ok(OutputFormat::Typeorm),
            "sql" => Ok(OutputFormat::Sql),
            other => Err(MigraError::invalid_config(format!(
                "未知的输出格式: {other}（可选 typeorm / sql）"
            ))),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: config::DEFAULT_OUTPUT_DIR.to_string(),
            format: OutputFormat::default(),
        }
    }
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            files_dir: config::DEFAULT_SQL_DIR.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            sql: SqlConfig::default(),
            database: None,
        }
    }
}

impl AppConfig {
    /// 智能查找并加载配置文件
    /// 按优先级查找：--config 指定路径 -> migra.toml -> .migra.toml
    pub fn find_and_load_config(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if path.exists() {
                tracing::info!("使用配置文件: {}", path.display());
                return Self::load_from_file(path);
            }
            tracing::warn!("指定的配置文件不存在: {}", path.display());
        }

        for config_file in &config::CONFIG_FILE_CANDIDATES {
            if Path::new(config_file).exists() {
                tracing::info!("找到配置文件: {}", config_file);
                return Self::load_from_file(config_file);
            }
        }

        // 没有配置文件时使用内存中的默认配置，不写盘
        tracing::warn!("未找到配置文件，使用默认配置（可运行 'migra init' 生成）");
        Ok(Self::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments()?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> Result<String> {
        const TEMPLATE: &str = include_str!("../templates/migra.toml.template");

        let mut content = TEMPLATE
            .replace("{output_dir}", &self.output.dir)
            .replace("{output_format}", &self.output.format.to_string())
            .replace("{sql_files_dir}", &self.sql.files_dir);

        // 模板里的 [database] 段是注释示例，已配置时追加真实内容
        if let Some(database) = &self.database {
            #[derive(Serialize)]
            struct DatabaseSection<'a> {
                database: &'a DatabaseConfig,
            }
            content.push('\n');
            content.push_str(&toml::to_string(&DatabaseSection { database })?);
        }

        Ok(content)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.output.dir.trim().is_empty() {
            return Err(MigraError::invalid_config("output.dir 不能为空"));
        }
        if self.sql.files_dir.trim().is_empty() {
            return Err(MigraError::invalid_config("sql.files_dir 不能为空"));
        }
        if let Some(database) = &self.database {
            if database.host.trim().is_empty() {
                return Err(MigraError::invalid_config("database.host 不能为空"));
            }
            if database.port == 0 {
                return Err(MigraError::invalid_config("database.port 必须为正数"));
            }
            if database.username.trim().is_empty() {
                return Err(MigraError::invalid_config("database.username 不能为空"));
            }
            if database.database.trim().is_empty() {
                return Err(MigraError::invalid_config("database.database 不能为空"));
            }
        }
        Ok(())
    }

    /// 迁移输出目录
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.dir)
    }

    /// 解析 SQL 输入文件路径
    ///
    /// 按原样存在则直接使用；相对路径找不到时再到 `sql.files_dir` 下查找。
    pub fn resolve_sql_file(&self, file: &Path) -> Result<PathBuf> {
        if file.exists() {
            return Ok(file.to_path_buf());
        }
        if file.is_relative() {
            let candidate = Path::new(&self.sql.files_dir).join(file);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(MigraError::missing_input(format!(
            "SQL 文件不存在: {}",
            file.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_round_trip_through_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("migra.toml");

        let config = AppConfig::default();
        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.output.format, OutputFormat::Typeorm);
        assert!(loaded.database.is_none());
    }

    #[test]
    fn test_config_with_database_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("migra.toml");

        let mut config = AppConfig::default();
        config.output.format = OutputFormat::Sql;
        config.database = Some(DatabaseConfig {
            host: "db.local".to_string(),
            port: 3307,
            username: "auditor".to_string(),
            password: "secret".to_string(),
            database: "shop".to_string(),
        });
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("[output]\ndir = \"db/migrations\"\n").unwrap();
        assert_eq!(config.output.dir, "db/migrations");
        assert_eq!(config.output.format, OutputFormat::Typeorm);
        assert_eq!(config.sql.files_dir, "sql");
    }

    #[test]
    fn test_validate_rejects_invalid_values() {
        let mut config = AppConfig::default();
        config.output.dir = "  ".to_string();
        assert!(matches!(config.validate(), Err(MigraError::InvalidConfig(_))));

        let mut config = AppConfig::default();
        config.database = Some(DatabaseConfig {
            host: "localhost".to_string(),
            port: 0,
            username: "root".to_string(),
            password: String::new(),
            database: "app".to_string(),
        });
        assert!(matches!(config.validate(), Err(MigraError::InvalidConfig(_))));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("TypeORM".parse::<OutputFormat>().unwrap(), OutputFormat::Typeorm);
        assert_eq!("sql".parse::<OutputFormat>().unwrap(), OutputFormat::Sql);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_resolve_sql_file_falls_back_to_files_dir() {
        let dir = tempdir().unwrap();
        let sql_dir = dir.path().join("sql");
        fs::create_dir_all(&sql_dir).unwrap();
        fs::write(sql_dir.join("add_email.sql"), "-- #UP\n").unwrap();

        let mut config = AppConfig::default();
        config.sql.files_dir = sql_dir.to_string_lossy().to_string();

        let resolved = config.resolve_sql_file(Path::new("add_email.sql")).unwrap();
        assert_eq!(resolved, sql_dir.join("add_email.sql"));
        assert!(matches!(
            config.resolve_sql_file(Path::new("missing.sql")),
            Err(MigraError::MissingInput(_))
        ));
    }
}
