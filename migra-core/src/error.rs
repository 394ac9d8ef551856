use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigraError>;

#[derive(Error, Debug)]
pub enum MigraError {
    #[error("SQL 解析错误: {0}")]
    Parse(String),

    #[error("缺少输入: {0}")]
    MissingInput(String),

    #[error("数据库元数据查询失败: {0}")]
    SchemaOracle(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("配置序列化错误: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("序列化错误: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("自定义错误: {0}")]
    Custom(String),
}

// sqlx 错误统一归入元数据查询失败
impl From<sqlx::Error> for MigraError {
    fn from(err: sqlx::Error) -> Self {
        MigraError::SchemaOracle(err.to_string())
    }
}

impl From<sqlparser::parser::ParserError> for MigraError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        MigraError::Parse(err.to_string())
    }
}

impl From<regex::Error> for MigraError {
    fn from(err: regex::Error) -> Self {
        MigraError::Custom(format!("正则表达式编译失败: {err}"))
    }
}

impl MigraError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    pub fn schema_oracle(msg: impl Into<String>) -> Self {
        Self::SchemaOracle(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}
