//! 解析模版
//!
//! 模版是一组具名的正则规则，决定如何在文本中定位题目边界、选项、答案、解析和讨论区。
//! 引擎只读取模版，从不修改它。

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// 模版字段名（与 JSON 载荷中的键一致，用于提示信息和错误报告）
pub mod fields {
    pub const QUESTION_SPLIT: &str = "questionSplitPattern";
    pub const QUESTION_NUMBER: &str = "questionNumberPattern";
    pub const OPTION: &str = "optionPattern";
    pub const CORRECT_ANSWER_LINE: &str = "correctAnswerLinePattern";
    pub const CORRECT_ANSWER_EXTRACT: &str = "correctAnswerExtractPattern";
    pub const EXPLANATION: &str = "explanationPattern";
    pub const HAS_DISCUSSION: &str = "hasDiscussion";
    pub const DISCUSSION_DATE: &str = "discussionDatePattern";
    pub const NOISE_LINES: &str = "noiseLinePatterns";
}

/// 讨论区日期锚点（"2 years, 1 month ago" 这类相对时间）
pub const DEFAULT_DISCUSSION_DATE_PATTERN: &str =
    r"(\d+\s+(?:year|month|week|day|hour)s?,\s*)*\d+\s+(?:year|month|week|day|hour)s?\s+ago";

/// 解析模版
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// 外部存储分配的 ID，内存中的临时模版为 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 是否为内置模版
    #[serde(default)]
    pub is_builtin: bool,

    // ---- 解析配置字段 ----
    /// 题目块分割正则（匹配每道题的起始位置）
    pub question_split_pattern: String,
    /// 题号提取正则（捕获组1=题号数字，捕获组2=剩余文本）
    pub question_number_pattern: String,
    /// 选项识别正则（捕获组1=选项字母）
    pub option_pattern: String,
    /// 正确答案行定位正则
    pub correct_answer_line_pattern: String,
    /// 正确答案提取正则（捕获组1=答案字母串）
    pub correct_answer_extract_pattern: String,
    /// 解析提取正则（捕获组1=解析文本）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_pattern: Option<String>,
    /// 是否解析讨论区
    #[serde(default)]
    pub has_discussion: bool,
    /// 讨论区日期锚点正则
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_date_pattern: Option<String>,
    /// 噪音行过滤正则，预处理时命中的行会被移除（页眉页脚、广告等）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub noise_line_patterns: Vec<String>,
}

impl Template {
    /// 内置的默认模版，对应 ExamTopics 格式的题库
    ///
    /// 答案提取正则要求字母串后面不能紧跟字母：匹配不区分大小写，
    /// 否则 "Correct Answer: A Explanation" 会把 "E" 也吞进答案。
    pub fn builtin() -> Self {
        Self {
            id: None,
            name: "ExamTopics 默认模版".to_string(),
            description: Some(
                "适用于 ExamTopics 格式的题库，支持 Topic/Question #N、A-F 选项、Correct Answer、Explanation 和讨论区解析。"
                    .to_string(),
            ),
            is_builtin: true,
            question_split_pattern: r"(?:^|\n)(?:Topic\s+\d+\s*)?Question\s*#?\d+".to_string(),
            question_number_pattern: r"(?:Topic\s+\d+\s*)?Question\s*#?(\d+)\s*[:.)-]?\s*(.*)$"
                .to_string(),
            option_pattern: r"^([A-F])[).:]\s+".to_string(),
            correct_answer_line_pattern: r"Correct\s*Answer[s]?\s*[:：]".to_string(),
            correct_answer_extract_pattern:
                r"Correct\s*Answer[s]?\s*[:：-]\s*([A-F](?:[,\s]*[A-F])*)(?:[^A-Za-z]|$)".to_string(),
            explanation_pattern: Some(r"Explanation\s*[:-](.*)$".to_string()),
            has_discussion: true,
            discussion_date_pattern: Some(DEFAULT_DISCUSSION_DATE_PATTERN.to_string()),
            noise_line_patterns: Vec::new(),
        }
    }

    /// 复制一份非内置模版（名称追加 "(副本)"，不保留 ID）
    pub fn duplicate(&self) -> Self {
        Self {
            id: None,
            name: format!("{} (副本)", self.name),
            is_builtin: false,
            ..self.clone()
        }
    }

    /// 所有非空的单值正则字段，按 (字段名, 正则) 列出
    pub fn pattern_fields(&self) -> Vec<(&'static str, &str)> {
        let mut out = vec![
            (fields::QUESTION_SPLIT, self.question_split_pattern.as_str()),
            (fields::QUESTION_NUMBER, self.question_number_pattern.as_str()),
            (fields::OPTION, self.option_pattern.as_str()),
            (fields::CORRECT_ANSWER_LINE, self.correct_answer_line_pattern.as_str()),
            (fields::CORRECT_ANSWER_EXTRACT, self.correct_answer_extract_pattern.as_str()),
        ];
        if let Some(p) = self.explanation_pattern.as_deref() {
            out.push((fields::EXPLANATION, p));
        }
        if let Some(p) = self.discussion_date_pattern.as_deref() {
            out.push((fields::DISCUSSION_DATE, p));
        }
        out.retain(|(_, p)| !p.is_empty());
        out
    }

    /// 解析行为相关字段的指纹，名称和描述不参与
    ///
    /// 与 ID 一起构成编译缓存的键：模版被编辑后指纹变化，旧的编译结果不会再被命中。
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.question_split_pattern.hash(&mut hasher);
        self.question_number_pattern.hash(&mut hasher);
        self.option_pattern.hash(&mut hasher);
        self.correct_answer_line_pattern.hash(&mut hasher);
        self.correct_answer_extract_pattern.hash(&mut hasher);
        self.explanation_pattern.hash(&mut hasher);
        self.has_discussion.hash(&mut hasher);
        self.discussion_date_pattern.hash(&mut hasher);
        self.noise_line_patterns.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_not_builtin() {
        let mut original = Template::builtin();
        original.id = Some(3);
        let copy = original.duplicate();
        assert!(!copy.is_builtin);
        assert_eq!(copy.id, None);
        assert_eq!(copy.name, "ExamTopics 默认模版 (副本)");
        assert_eq!(copy.option_pattern, original.option_pattern);
        assert_eq!(copy.fingerprint(), original.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_name_but_tracks_patterns() {
        let a = Template::builtin();
        let mut b = a.clone();
        b.name = "renamed".to_string();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.option_pattern = r"^\(([A-F])\)\s+".to_string();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_pattern_fields_skip_absent_optionals() {
        let mut t = Template::builtin();
        t.explanation_pattern = None;
        t.discussion_date_pattern = Some(String::new());
        let names: Vec<_> = t.pattern_fields().into_iter().map(|(f, _)| f).collect();
        assert_eq!(names.len(), 5);
        assert!(!names.contains(&fields::EXPLANATION));
        assert!(!names.contains(&fields::DISCUSSION_DATE));
    }

    #[test]
    fn test_deserialize_from_camel_case_toml() {
        let text = r#"
name = "Simple"
questionSplitPattern = '(?:^|\n)\d+\.\s+'
questionNumberPattern = '^(\d+)\.\s+(.*)$'
optionPattern = '^([A-F])\.\s+'
correctAnswerLinePattern = 'Answer\s*:'
correctAnswerExtractPattern = 'Answer\s*:\s*([A-F]+)'
noiseLinePatterns = ['^Page \d+$']
"#;
        let t: Template = toml::from_str(text).unwrap();
        assert_eq!(t.name, "Simple");
        assert!(!t.has_discussion);
        assert!(!t.is_builtin);
        assert_eq!(t.explanation_pattern, None);
        assert_eq!(t.noise_line_patterns, vec![r"^Page \d+$".to_string()]);
    }
}
