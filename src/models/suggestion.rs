//! 建议模版
//!
//! 由启发式样本分析或外部 AI 调用产出的"半成品"模版，每个字段都可能缺失，
//! 附带按字段名索引的说明文字。

use crate::error::{SuggestionError, TemplateError};
use crate::models::template::{fields, Template};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static RE_CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("static regex"));

/// 建议模版
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_split_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_number_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_line_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_extract_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_discussion: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_date_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_line_patterns: Option<Vec<String>>,
    /// 字段名 -> 说明
    #[serde(default)]
    pub hints: BTreeMap<String, String>,
}

impl SuggestedTemplate {
    /// 解析外部返回的 JSON 文本，允许外层包着 markdown 代码块
    pub fn from_json(text: &str) -> Result<Self, SuggestionError> {
        let trimmed = text.trim();
        let json = RE_CODE_FENCE
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(trimmed);
        Ok(serde_json::from_str(json)?)
    }

    pub fn set_hint(&mut self, field: &str, hint: impl Into<String>) {
        self.hints.insert(field.to_string(), hint.into());
    }

    pub fn hint(&self, field: &str) -> Option<&str> {
        self.hints.get(field).map(String::as_str)
    }

    /// 可变访问单值正则字段，用于统一校验
    pub(crate) fn pattern_slots_mut(&mut self) -> [(&'static str, &mut Option<String>); 7] {
        [
            (fields::QUESTION_SPLIT, &mut self.question_split_pattern),
            (fields::QUESTION_NUMBER, &mut self.question_number_pattern),
            (fields::OPTION, &mut self.option_pattern),
            (fields::CORRECT_ANSWER_LINE, &mut self.correct_answer_line_pattern),
            (fields::CORRECT_ANSWER_EXTRACT, &mut self.correct_answer_extract_pattern),
            (fields::EXPLANATION, &mut self.explanation_pattern),
            (fields::DISCUSSION_DATE, &mut self.discussion_date_pattern),
        ]
    }

    /// 将建议补全为正式模版
    ///
    /// 五个必填正则缺任何一个都返回 `MissingField`；不在这里编译校验，
    /// 调用方应先走 `sanitize_suggestion` 或 `validate_template`。
    pub fn into_template(self, name: impl Into<String>) -> Result<Template, TemplateError> {
        fn required(value: Option<String>, field: &'static str) -> Result<String, TemplateError> {
            value
                .filter(|v| !v.is_empty())
                .ok_or(TemplateError::MissingField { field })
        }

        Ok(Template {
            id: None,
            name: name.into(),
            description: None,
            is_builtin: false,
            question_split_pattern: required(self.question_split_pattern, fields::QUESTION_SPLIT)?,
            question_number_pattern: required(self.question_number_pattern, fields::QUESTION_NUMBER)?,
            option_pattern: required(self.option_pattern, fields::OPTION)?,
            correct_answer_line_pattern: required(
                self.correct_answer_line_pattern,
                fields::CORRECT_ANSWER_LINE,
            )?,
            correct_answer_extract_pattern: required(
                self.correct_answer_extract_pattern,
                fields::CORRECT_ANSWER_EXTRACT,
            )?,
            explanation_pattern: self.explanation_pattern.filter(|p| !p.is_empty()),
            has_discussion: self.has_discussion.unwrap_or(false),
            discussion_date_pattern: self.discussion_date_pattern.filter(|p| !p.is_empty()),
            noise_line_patterns: self.noise_line_patterns.unwrap_or_default(),
        })
    }
}
