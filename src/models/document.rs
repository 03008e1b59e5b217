//! 上传文档边界
//!
//! 外部协作方（文件上传、PDF 文本抽取）交给引擎的对象在这里校验一次，
//! 之后核心解析只接收 `DocumentText`。

use crate::error::ParseError;

/// 上传的文档：原始字节 + 原始文件名
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Vec<u8>,
    pub original_name: String,
}

/// 通过校验的文档文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    /// 试卷标题（去掉最后一个扩展名的文件名）
    pub title: String,
    pub text: String,
}

impl UploadedDocument {
    pub fn new(bytes: impl Into<Vec<u8>>, original_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            original_name: original_name.into(),
        }
    }

    /// 校验并解码为文本（UTF-8，非法字节替换）
    pub fn into_text(self) -> Result<DocumentText, ParseError> {
        if self.original_name.trim().is_empty() {
            return Err(ParseError::InvalidDocument {
                reason: "文件名为空".to_string(),
            });
        }
        if self.bytes.is_empty() {
            return Err(ParseError::InvalidDocument {
                reason: "文件为空".to_string(),
            });
        }

        let title = title_from_name(&self.original_name);
        let text = String::from_utf8(self.bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Ok(DocumentText { title, text })
    }
}

/// 去掉最后一个扩展名
pub fn title_from_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
