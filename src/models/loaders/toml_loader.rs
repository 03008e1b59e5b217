use crate::models::template::Template;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载模版
///
/// 字段名与 JSON 载荷一致（camelCase）。文件里不需要写 `isBuiltin`，
/// 从文件加载的模版一律视为用户模版。
pub async fn load_template(toml_file_path: &Path) -> Result<Template> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取模版文件: {}", toml_file_path.display()))?;

    let mut template: Template = toml::from_str(&content)
        .with_context(|| format!("无法解析模版文件: {}", toml_file_path.display()))?;

    template.is_builtin = false;

    tracing::info!("已加载模版: {}", template.name);

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_template_forces_user_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.toml");
        let mut builtin = Template::builtin();
        builtin.name = "from file".to_string();
        std::fs::write(&path, toml::to_string(&builtin).unwrap()).unwrap();

        let loaded = load_template(&path).await.unwrap();
        assert_eq!(loaded.name, "from file");
        assert!(!loaded.is_builtin);
        assert_eq!(loaded.option_pattern, builtin.option_pattern);
    }

    #[tokio::test]
    async fn test_load_template_missing_file() {
        let err = load_template(Path::new("/definitely/not/here.toml")).await.unwrap_err();
        assert!(err.to_string().contains("无法读取模版文件"));
    }
}
