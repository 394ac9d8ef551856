//! migra 项目信息
//!
//! migra-cli 是面向用户的主程序，项目元数据统一在这里定义；
//! migra-core 作为内部库，只提供技术性常量。

/// 项目元数据（自动从 migra-cli 的 Cargo.toml 同步）
pub mod metadata {
    /// 项目名称
    pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

    /// 项目描述
    pub const PROJECT_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

    pub const PROJECT_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

    pub const PROJECT_LICENSE: &str = env!("CARGO_PKG_LICENSE");

    /// 用户友好的显示名称（手动维护）
    pub mod display {
        pub const FRIENDLY_NAME: &str = "migra";

        /// 比 Cargo.toml 中更详细的描述
        pub const DESCRIPTION_LONG: &str = "从带 -- #UP / -- #DOWN 段的 SQL 文件生成 MySQL 迁移：为每张业务表维护 ad_ 审计表，并重建写入审计表的 INSERT / UPDATE / DELETE 触发器，输出 TypeORM 迁移类或纯 SQL 文件";
    }
}

/// 版本信息
pub mod version_info {
    /// CLI 版本（自动从 Cargo.toml 同步）
    pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// 获取版本信息字符串
pub fn get_version_string() -> String {
    format!("{} v{}", metadata::display::FRIENDLY_NAME, version_info::CLI_VERSION)
}

/// 获取作者和许可证信息
pub fn get_copyright_info() -> String {
    format!(
        "© {} - Licensed under {}",
        metadata::PROJECT_AUTHORS,
        metadata::PROJECT_LICENSE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        assert_eq!(metadata::PROJECT_NAME, "migra-cli");
        assert!(get_version_string().starts_with("migra v"));
        assert!(get_copyright_info().contains("MIT OR Apache-2.0"));
    }
}
