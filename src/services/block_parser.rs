//! 题目块解析 - 业务能力层
//!
//! 只处理单个题目块：切出"题干+选项"区域与答案行之后的讨论区，
//! 提取题号、题干、选项、答案、解析和讨论评论。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::exam::Question;
use crate::services::discussion::{clean_glyphs, reconstruct_comments};
use crate::services::field_extractor::{extract_correct_answers, extract_explanation};
use crate::services::option_extractor::{build_options, locate_options};
use crate::services::pattern_cache::CompiledTemplate;
use crate::utils::truncate_text;

/// 兜底题号：`12) text` / `12. text`
static RE_NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[).:\s]+(.*)$").expect("static regex"));

/// 题目首行解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    number: Option<u32>,
    /// 题号之后同一行的题干文字
    rest: Option<String>,
}

/// 解析题目首行
///
/// 先用模版的题号正则，再用兜底正则；都不匹配返回 None（首行整体算作题干）。
fn parse_header(first_line: &str, number_re: Option<&Regex>) -> Option<Header> {
    let caps = number_re
        .and_then(|re| re.captures(first_line))
        .or_else(|| RE_NUMBERED_LINE.captures(first_line))?;

    let number = caps.get(1).and_then(|m| m.as_str().trim().parse().ok());
    let rest = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|r| !r.is_empty());

    Some(Header { number, rest })
}

/// 解析一个题目块
///
/// # 返回
/// - `Some(Question)`: 解析成功
/// - `None`: 题干+选项区域为空，或没有任何选项行；该块被丢弃，不算错误
pub fn parse_block(block: &str, compiled: &CompiledTemplate) -> Option<Question> {
    let lines: Vec<&str> = block
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    let answer_line = compiled
        .correct_answer_line
        .as_ref()
        .and_then(|re| lines.iter().position(|line| re.is_match(line)));

    let (qa_lines, discussion_lines) = match answer_line {
        Some(idx) => (&lines[..idx], &lines[idx + 1..]),
        None => (&lines[..], &lines[lines.len()..]),
    };

    let Some(first_line) = qa_lines.first() else {
        debug!("答案行之前没有内容，丢弃题目块");
        return None;
    };

    let header = parse_header(first_line, compiled.question_number.as_ref());

    let located = compiled
        .option
        .as_ref()
        .map(|re| locate_options(qa_lines, re))
        .unwrap_or_default();

    let Some(first_option) = located.first().map(|o| o.index) else {
        debug!("未找到选项行，丢弃题目块: {}", truncate_text(first_line, 60));
        return None;
    };

    let text_lines: Vec<&str> = match &header {
        Some(header) => header
            .rest
            .as_deref()
            .into_iter()
            .chain(qa_lines.iter().take(first_option).skip(1).copied())
            .collect(),
        None => qa_lines[..first_option].to_vec(),
    };

    let options = build_options(qa_lines, &located);
    let correct_answers = extract_correct_answers(&lines, compiled.correct_answer_extract.as_ref());
    let explanation = extract_explanation(&lines, compiled.explanation.as_ref());

    let (discussion, comments) = if compiled.has_discussion && !discussion_lines.is_empty() {
        let discussion = clean_glyphs(discussion_lines.join("\n").trim())
            .trim()
            .to_string();
        if discussion.is_empty() {
            (None, None)
        } else {
            let comments = compiled
                .discussion_date
                .as_ref()
                .map(|anchor| reconstruct_comments(&discussion, anchor));
            (Some(discussion), comments)
        }
    } else {
        (None, None)
    };

    Some(Question {
        number: header.as_ref().and_then(|h| h.number),
        text: text_lines.join(" "),
        options,
        correct_answers,
        explanation,
        discussion,
        comments,
    })
}
