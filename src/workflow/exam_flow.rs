//! 试卷解析流程 - 流程层
//!
//! 核心职责：定义"一份文本 → 一份试卷"的完整流程
//!
//! 流程顺序：
//! 1. 取得（或编译）模版快照
//! 2. 预处理：统一换行、清理行、过滤噪音行
//! 3. 切分题目块
//! 4. 逐块解析，丢弃无效块
//!
//! 同一份输入和同一个模版总是得到同样的结果；流程不持有任何可变状态，
//! 可以在多个线程中同时调用。

use std::sync::Arc;
use tracing::debug;

use crate::error::ParseError;
use crate::models::document::UploadedDocument;
use crate::models::exam::Exam;
use crate::models::template::Template;
use crate::services::block_parser::parse_block;
use crate::services::pattern_cache::PatternCache;
use crate::services::preprocessor::normalize;
use crate::services::segmenter::split_blocks;

/// 试卷解析器
///
/// - 只持有编译缓存
/// - 模版由调用方按次传入，从不修改
#[derive(Debug, Clone)]
pub struct ExamParser {
    cache: Arc<PatternCache>,
}

impl Default for ExamParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamParser {
    /// 使用进程级共享缓存
    pub fn new() -> Self {
        Self::with_cache(PatternCache::global())
    }

    /// 使用指定的缓存（测试或隔离场景）
    pub fn with_cache(cache: Arc<PatternCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// 把原始文本解析为试卷
    ///
    /// # 参数
    /// - `raw_text`: 抽取出的原始文本
    /// - `template`: 解析模版
    ///
    /// # 返回
    /// - `Ok(Exam)`: 标题为空，题目按出现顺序排列（可能为空）
    /// - `Err(ParseError::EmptyInput)`: 预处理后没有任何文字
    pub fn parse(&self, raw_text: &str, template: &Template) -> Result<Exam, ParseError> {
        let compiled = self.cache.get_or_compile(template);

        let text = normalize(raw_text, &compiled.noise_lines);
        if text.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let blocks = split_blocks(&text, compiled.question_split.as_ref());
        debug!("切分出 {} 个题目块", blocks.len());

        let questions: Vec<_> = blocks
            .iter()
            .filter_map(|block| parse_block(block, &compiled))
            .collect();

        debug!(
            "解析出 {} 道题（丢弃 {} 个无效块）",
            questions.len(),
            blocks.len() - questions.len()
        );

        Ok(Exam {
            title: String::new(),
            questions,
        })
    }

    /// 解析上传的文档，试卷标题取自文件名
    pub fn parse_document(
        &self,
        document: UploadedDocument,
        template: &Template,
    ) -> Result<Exam, ParseError> {
        let doc = document.into_text()?;
        Ok(self.parse(&doc.text, template)?.with_title(doc.title))
    }
}

/// 使用共享缓存解析原始文本
pub fn parse(raw_text: &str, template: &Template) -> Result<Exam, ParseError> {
    ExamParser::new().parse(raw_text, template)
}

/// 使用共享缓存解析上传的文档
pub fn parse_document(document: UploadedDocument, template: &Template) -> Result<Exam, ParseError> {
    ExamParser::new().parse_document(document, template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::OptionLabel;

    fn parser() -> ExamParser {
        ExamParser::with_cache(Arc::new(PatternCache::new()))
    }

    #[test]
    fn test_whitespace_only_is_empty_input() {
        let err = parser().parse(" \r\n\t\n ", &Template::builtin()).unwrap_err();
        assert_eq!(err, ParseError::EmptyInput);
    }

    #[test]
    fn test_noise_only_is_empty_input() {
        let mut t = Template::builtin();
        t.noise_line_patterns = vec![r"^Page \d+$".to_string()];
        let err = parser().parse("Page 1\nPage 2", &t).unwrap_err();
        assert_eq!(err, ParseError::EmptyInput);
    }

    #[test]
    fn test_text_without_questions_gives_empty_exam() {
        let exam = parser().parse("just some prose", &Template::builtin()).unwrap();
        assert_eq!(exam.title, "");
        assert!(exam.questions.is_empty());
    }

    #[test]
    fn test_noise_lines_do_not_leak_into_options() {
        let mut t = Template::builtin();
        t.noise_line_patterns = vec![r"^ExamTopics - Expert Verified".to_string()];
        let raw = "Question #1 Pick\nA. one\nExamTopics - Expert Verified, Online\nB. two\nCorrect Answer: B";
        let exam = parser().parse(raw, &t).unwrap();
        assert_eq!(exam.questions[0].options[0].text, "one");
        assert_eq!(exam.questions[0].correct_answers, vec![OptionLabel::B]);
    }

    #[test]
    fn test_parse_document_sets_title() {
        let doc = UploadedDocument::new(
            "Question #1 Q?\nA. a\nB. b\nCorrect Answer: A".as_bytes(),
            "saa-c03.dump.txt",
        );
        let exam = parser().parse_document(doc, &Template::builtin()).unwrap();
        assert_eq!(exam.title, "saa-c03.dump");
        assert_eq!(exam.question_count(), 1);
    }

    #[test]
    fn test_parse_document_rejects_empty_upload() {
        let doc = UploadedDocument::new(Vec::new(), "empty.txt");
        let err = parser().parse_document(doc, &Template::builtin()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDocument { .. }));
    }

    #[test]
    fn test_repeated_parse_reuses_compiled_template() {
        let p = parser();
        let t = Template::builtin();
        let first = p.parse("Question #1 Q?\nA. a", &t).unwrap();
        let second = p.parse("Question #1 Q?\nA. a", &t).unwrap();
        assert_eq!(first, second);
        assert_eq!(p.cache().len(), 1);
    }
}
