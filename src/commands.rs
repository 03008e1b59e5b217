//! 命令行子命令
//!
//! 批量解析之外的三个辅助命令：分析样本、校验模版文件、检查外部生成的建议模版。
//! 结果以 JSON 打印到标准输出，过程信息走日志。

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{SuggestedTemplate, Template};
use crate::services::format_detector::analyze_sample;
use crate::services::template_validator::{sanitize_suggestion, validate_template};

fn read_file(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path.display().to_string(), e))
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Other(e.to_string()))
}

/// 分析样本文件，返回建议模版的 JSON
pub fn analyze(sample_path: &Path) -> AppResult<String> {
    let sample = read_file(sample_path)?;
    let suggestion = analyze_sample(&sample);

    for (field, hint) in &suggestion.hints {
        info!("{}: {}", field, hint);
    }

    to_pretty_json(&suggestion)
}

/// 加载并校验模版文件
pub fn validate(template_path: &Path) -> AppResult<Template> {
    let content = read_file(template_path)?;
    let template: Template = toml::from_str(&content)
        .map_err(|e| AppError::toml_parse_failed(template_path.display().to_string(), e))?;

    validate_template(&template)?;
    info!("✓ 模版 \"{}\" 的所有正则均可编译", template.name);

    Ok(template)
}

/// 检查外部生成的建议模版，返回清洗后的 JSON
pub fn suggest_check(suggestion_path: &Path) -> AppResult<String> {
    let content = read_file(suggestion_path)?;
    let suggestion = sanitize_suggestion(SuggestedTemplate::from_json(&content)?);
    let json = to_pretty_json(&suggestion)?;

    match suggestion.into_template("建议模版") {
        Ok(_) => info!("✓ 建议模版可以直接保存"),
        Err(e) => warn!("⚠️ 建议模版还不能保存: {}", e),
    }

    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FileError, TemplateError};
    use tempfile::tempdir;

    #[test]
    fn test_analyze_reports_detected_patterns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        fs::write(&path, "Question #1 Q?\nA. a\nB. b\nCorrect Answer: A").unwrap();

        let json = analyze(&path).unwrap();
        let suggestion: SuggestedTemplate = serde_json::from_str(&json).unwrap();
        assert!(suggestion.question_split_pattern.is_some());
        assert_eq!(suggestion.has_discussion, Some(false));
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.toml");
        fs::write(
            &path,
            r#"
name = "broken"
questionSplitPattern = '(?:^|\n)\d+\.'
questionNumberPattern = '^(\d+)\.\s+(.*)$'
optionPattern = '^([A-F]\.'
correctAnswerLinePattern = 'Answer:'
correctAnswerExtractPattern = 'Answer:\s*([A-F]+)'
"#,
        )
        .unwrap();

        let err = validate(&path).unwrap_err();
        assert!(matches!(
            err,
            AppError::Template(TemplateError::InvalidPattern { field: "optionPattern", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = validate(Path::new("/no/such/template.toml")).unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }

    #[test]
    fn test_suggest_check_clears_invalid_pattern() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.json");
        fs::write(&path, r#"{"optionPattern": "([A-F]", "hasDiscussion": true}"#).unwrap();

        let json = suggest_check(&path).unwrap();
        let cleaned: SuggestedTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(cleaned.option_pattern, None);
        assert!(cleaned.hint("optionPattern").is_some());

        fs::write(&path, "not json").unwrap();
        assert!(matches!(suggest_check(&path), Err(AppError::Suggestion(_))));
    }
}
