use migra_core::migration::MigrationPlan;
use std::path::{Path, PathBuf};

/// `<timestamp>-<name>.ts` 及其内容
pub fn render_file(
    output_dir: &Path,
    name: &str,
    timestamp: i64,
    plan: &MigrationPlan,
) -> (PathBuf, String) {
    let path = output_dir.join(format!("{timestamp}-{name}.ts"));
    (path, render_migration(name, timestamp, plan))
}

/// 生成 TypeORM `MigrationInterface` 类
pub fn render_migration(name: &str, timestamp: i64, plan: &MigrationPlan) -> String {
    format!(
        r#"import type {{ MigrationInterface, QueryRunner }} from "typeorm";

export class {class_name}{timestamp} implements MigrationInterface {{
  public async up(queryRunner: QueryRunner): Promise<void> {{
{up}
  }}

  public async down(queryRunner: QueryRunner): Promise<void> {{
{down}
  }}
}}
"#,
        class_name = class_name(name),
        up = render_queries(&plan.up),
        down = render_queries(&plan.down),
    )
}

/// `add_user-age` → `AddUserAge`，去掉不能出现在标识符中的字符
pub fn class_name(name: &str) -> String {
    let mut class_name: String = name
        .split(['_', '-', ',', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<String>()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
        .collect();

    if class_name.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        class_name.insert(0, '_');
    }
    class_name
}

fn render_queries(statements: &[String]) -> String {
    statements
        .iter()
        .map(|statement| format!("    await queryRunner.query(`{}`);", escape_template(statement)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 转义模板字符串中的 `\`、反引号和 `${`
fn escape_template(sql: &str) -> String {
    sql.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
