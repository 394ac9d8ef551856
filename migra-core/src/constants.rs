/// 迁移文件分段标记
pub mod markers {
    /// UP 段标记（`-- #UP`）
    pub const UP: &str = "#UP";

    /// DOWN 段标记（`-- #DOWN`）
    pub const DOWN: &str = "#DOWN";
}

/// 审计表相关常量
pub mod audit {
    /// 审计表名前缀
    pub const TABLE_PREFIX: &str = "ad_";

    /// 固定审计列，位于所有业务列之前
    pub const FIXED_COLUMNS: [&str; 10] = [
        "id_audit INT AUTO_INCREMENT PRIMARY KEY",
        "oper CHAR(1) DEFAULT NULL",
        "data_audit DATE DEFAULT NULL",
        "hora_audit TIME DEFAULT NULL",
        "id_usuario INT UNSIGNED DEFAULT NULL",
        "usuario VARCHAR(510) DEFAULT NULL",
        "plataforma VARCHAR(50) DEFAULT NULL",
        "ip_reverso VARCHAR(50) DEFAULT NULL",
        "sistema_operacional VARCHAR(50) DEFAULT NULL",
        "requisicao_id VARCHAR(50) DEFAULT NULL",
    ];

    /// 审计适配器拒绝的关键字（出现即无审计意义）
    pub const REJECTED_KEYWORDS: [&str; 7] = [
        "CONSTRAINT",
        "FOREIGN KEY",
        "PRIMARY KEY",
        "INDEX",
        "UNIQUE",
        "CHECK",
        "ENGINE",
    ];

    /// 获取审计表名
    pub fn audit_table_name(table_name: &str) -> String {
        format!("{TABLE_PREFIX}{table_name}")
    }
}

/// 触发器相关常量
pub mod triggers {
    /// INSERT 触发器后缀
    pub const INSERT_SUFFIX: &str = "_di";

    /// UPDATE 触发器后缀
    pub const UPDATE_SUFFIX: &str = "_da";

    /// DELETE 触发器后缀
    pub const DELETE_SUFFIX: &str = "_de";

    /// 填充会话变量的存储过程调用
    pub const CONNECTION_INFO_CALL: &str = "CALL getConnectionInfo(@cnn_usuario, @cnn_plataforma, @cnn_ip_reverso, @cnn_sistema_operacional, @cnn_requisicao_id);";

    /// 审计表中由触发器填充的固定列
    pub const AUDIT_INSERT_COLUMNS: &str = "oper, data_audit, hora_audit, usuario, plataforma, ip_reverso, sistema_operacional, requisicao_id";

    /// 与固定列一一对应的取值
    pub const AUDIT_INSERT_VALUES: &str = "CURRENT_DATE, CURRENT_TIME, @cnn_usuario, @cnn_plataforma, @cnn_ip_reverso, @cnn_sistema_operacional, @cnn_requisicao_id";
}

/// 配置相关常量
pub mod config {
    use std::path::{Path, PathBuf};

    /// 默认配置文件名
    pub const CONFIG_FILE_NAME: &str = "migra.toml";

    /// 配置文件查找顺序
    pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["migra.toml", ".migra.toml"];

    /// 默认迁移输出目录
    pub const DEFAULT_OUTPUT_DIR: &str = "src/migrations";

    /// 默认 SQL 输入目录
    pub const DEFAULT_SQL_DIR: &str = "sql";

    /// 数据库连接串环境变量
    pub const DATABASE_URL_ENV: &str = "MIGRA_DATABASE_URL";

    /// 默认 MySQL 端口
    pub const DEFAULT_MYSQL_PORT: u16 = 3306;

    /// 获取默认配置文件路径
    pub fn get_config_file_path() -> PathBuf {
        Path::new(".").join(CONFIG_FILE_NAME)
    }
}

/// 迁移命名约束
pub mod migration {
    /// 迁移名最小长度
    pub const NAME_MIN_LEN: usize = 3;

    /// 迁移名最大长度
    pub const NAME_MAX_LEN: usize = 255;

    /// 未指定名称时的前缀
    pub const DEFAULT_NAME_PREFIX: &str = "Migration";
}
