use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 解析调用失败
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 模版配置错误
    #[error("模版错误: {0}")]
    Template(#[from] TemplateError),
    /// 建议模版载荷错误
    #[error("建议模版错误: {0}")]
    Suggestion(#[from] SuggestionError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 解析调用级别的错误
///
/// 只有这两类会让一次 `parse` 失败，其余异常都降级为更少的题目
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// 预处理后没有任何可用文字
    #[error("未能从文档中提取到文字内容")]
    EmptyInput,
    /// 上传文档在边界校验时不合法
    #[error("文档无效: {reason}")]
    InvalidDocument { reason: String },
}

/// 模版错误
#[derive(Debug, Error)]
pub enum TemplateError {
    /// 字段的正则无法编译
    #[error("字段 \"{field}\" 的正则表达式无效: {pattern}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// 必填字段缺失
    #[error("模版缺少必填字段: {field}")]
    MissingField { field: &'static str },
}

/// 建议模版载荷错误
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// 载荷不是合法的 JSON 对象
    #[error("建议模版 JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(path: impl Into<String>, source: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source,
        })
    }
}

impl TemplateError {
    /// 创建正则编译失败错误
    pub fn invalid_pattern(field: &'static str, pattern: impl Into<String>, source: regex::Error) -> Self {
        TemplateError::InvalidPattern {
            field,
            pattern: pattern.into(),
            source,
        }
    }

    /// 出错的字段名
    pub fn field(&self) -> &'static str {
        match self {
            TemplateError::InvalidPattern { field, .. } | TemplateError::MissingField { field } => {
                field
            }
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_reports_field() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = TemplateError::invalid_pattern("optionPattern", "(", source);
        assert_eq!(err.field(), "optionPattern");
        assert!(err.to_string().contains("optionPattern"));
    }

    #[test]
    fn test_parse_error_converts_into_app_error() {
        let err: AppError = ParseError::EmptyInput.into();
        assert!(matches!(err, AppError::Parse(ParseError::EmptyInput)));
    }
}
