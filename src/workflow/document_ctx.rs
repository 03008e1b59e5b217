//! 文档处理上下文
//!
//! 封装"我正在处理第几份文档、它叫什么"这一信息

use std::fmt::Display;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档索引（从1开始，仅用于日志显示）
    pub document_index: usize,

    /// 上传时的原始文件名
    pub original_name: String,
}

impl DocumentCtx {
    pub fn new(document_index: usize, original_name: impl Into<String>) -> Self {
        Self {
            document_index,
            original_name: original_name.into(),
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 #{} {}]", self.document_index, self.original_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = DocumentCtx::new(3, "aws-saa.txt");
        assert_eq!(ctx.to_string(), "[文档 #3 aws-saa.txt]");
    }
}
