use migra_core::migration::MigrationPlan;
use std::path::{Path, PathBuf};

/// `<timestamp>_<name>.up.sql` / `.down.sql`
pub fn render_files(
    output_dir: &Path,
    name: &str,
    timestamp: i64,
    plan: &MigrationPlan,
) -> Vec<(PathBuf, String)> {
    vec![
        (
            output_dir.join(format!("{timestamp}_{name}.up.sql")),
            render_statements(&plan.up),
        ),
        (
            output_dir.join(format!("{timestamp}_{name}.down.sql")),
            render_statements(&plan.down),
        ),
    ]
}

/// 复合语句（触发器、存储过程）内部含有 `;`，统一用 `$$` 作为分隔符
fn render_statements(statements: &[String]) -> String {
    if statements.is_empty() {
        return String::new();
    }

    let mut content = String::from("DELIMITER $$\n\n");
    for statement in statements {
        let body = statement.trim().trim_end_matches(';').trim_end();
        content.push_str(body);
        content.push_str("$$\n\n");
    }
    content.push_str("DELIMITER ;\n");
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use migra_core::migration::MigrationKind;

    #[test]
    fn test_render_files() {
        let plan = MigrationPlan {
            kind: MigrationKind::Create,
            up: vec![
                "CREATE TABLE t (id INT);".to_string(),
                "CREATE TRIGGER t_di AFTER INSERT ON t FOR EACH ROW BEGIN INSERT INTO ad_t (id) VALUES (NEW.id); END;"
                    .to_string(),
            ],
            down: Vec::new(),
            warnings: Vec::new(),
        };

        let files = render_files(Path::new("out"), "CreateT", 7, &plan);
        assert_eq!(files[0].0, Path::new("out").join("7_CreateT.up.sql"));
        assert_eq!(files[1].0, Path::new("out").join("7_CreateT.down.sql"));
        assert_eq!(
            files[0].1,
            "DELIMITER $$\n\nCREATE TABLE t (id INT)$$\n\nCREATE TRIGGER t_di AFTER INSERT ON t FOR EACH ROW BEGIN INSERT INTO ad_t (id) VALUES (NEW.id); END$$\n\nDELIMITER ;\n"
        );
        assert!(files[1].1.is_empty());
    }
}
