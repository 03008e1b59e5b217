//! 答案与解析提取 - 业务能力层
//!
//! 两者都作用在整个题目块的所有行上（而不只是题干+选项区域），
//! 模版正则未命中时各自尝试一个内置的兜底正则。

use regex::Regex;
use std::sync::LazyLock;

use crate::models::exam::OptionLabel;
use crate::services::preprocessor::clean_line;

/// 兜底：`Answer: A` / `Answers - A, C`
static RE_ANSWER_FALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Answer[s]?\s*[:-]\s*([A-F](?:[,\s]*[A-F])*)(?:[^A-Za-z]|$)")
        .expect("static regex")
});

/// 兜底：`解析: ...`
static RE_EXPLANATION_FALLBACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)解析\s*[:-](.*)$").expect("static regex"));

/// 提取正确答案
///
/// 所有行以空格连接后匹配，捕获组1 去掉 A-F 以外的字符（逗号、空格等）并转大写，
/// 每个字母一个答案。不去重，也不校验是否存在对应选项。
pub fn extract_correct_answers(lines: &[&str], extract: Option<&Regex>) -> Vec<OptionLabel> {
    let joined = lines.join(" ");

    let caps = extract
        .and_then(|re| re.captures(&joined))
        .or_else(|| RE_ANSWER_FALLBACK.captures(&joined));

    let Some(raw) = caps.as_ref().and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    raw.as_str().chars().filter_map(OptionLabel::from_char).collect()
}

/// 提取解析
///
/// 所有行以换行连接后匹配，捕获组1 重新按行清理并以空格连接；
/// 没有匹配或内容为空时返回 None。
pub fn extract_explanation(lines: &[&str], explanation: Option<&Regex>) -> Option<String> {
    let joined = lines.join("\n");

    let caps = explanation
        .and_then(|re| re.captures(&joined))
        .or_else(|| RE_EXPLANATION_FALLBACK.captures(&joined))?;

    let cleaned: Vec<String> = caps
        .get(1)?
        .as_str()
        .split('\n')
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(" "))
    }
}
