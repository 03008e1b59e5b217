//! 题目分块 - 业务能力层
//!
//! 用模版的分割正则把规范化文本切成每道题一个文本块；
//! 分割正则一次都没命中时，退回按空行段落切分。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RE_PARAGRAPH_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("static regex"));

/// 切分题目块
///
/// 第 i 块从第 i 个匹配的起点延伸到第 i+1 个匹配的起点（最后一块到文本末尾）。
/// 第一个匹配之前的文字不属于任何题目。块去除首尾空白，空块丢弃。
pub fn split_blocks<'a>(text: &'a str, split: Option<&Regex>) -> Vec<&'a str> {
    let starts: Vec<usize> = split
        .map(|re| re.find_iter(text).map(|m| m.start()).collect())
        .unwrap_or_default();

    if starts.is_empty() {
        debug!("分割正则未命中，按空行段落切分");
        return split_paragraphs(text);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            text[start..end].trim()
        })
        .filter(|block| !block.is_empty())
        .collect()
}

/// 按两个及以上连续换行切分
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    RE_PARAGRAPH_GAP
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_re() -> Regex {
        regex::RegexBuilder::new(r"(?:^|\n)(?:Topic\s+\d+\s*)?Question\s*#?\d+")
            .case_insensitive(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_split_on_headers() {
        let text = "preamble\nQuestion #1\nbody one\nquestion #2\nbody two";
        let re = split_re();
        let blocks = split_blocks(text, Some(&re));
        assert_eq!(blocks, vec!["Question #1\nbody one", "question #2\nbody two"]);
    }

    #[test]
    fn test_header_at_text_start() {
        let text = "Topic 1 Question #5\nA. x";
        let re = split_re();
        assert_eq!(split_blocks(text, Some(&re)), vec!["Topic 1 Question #5\nA. x"]);
    }

    #[test]
    fn test_fallback_when_no_match() {
        let text = "one\ntwo\n\n\nthree\n\nfour";
        let re = split_re();
        assert_eq!(split_blocks(text, Some(&re)), vec!["one\ntwo", "three", "four"]);
        assert_eq!(split_blocks(text, None), vec!["one\ntwo", "three", "four"]);
    }

    #[test]
    fn test_empty_text_yields_no_blocks() {
        assert!(split_blocks("", None).is_empty());
    }

    #[test]
    fn test_paragraph_split_is_idempotent() {
        let samples = [
            "a\n\nb\n\n\n\nc",
            "\n\n  x  \n\n\n y\nz \n\n",
            "single block\nwith lines",
            "p1\n \n\np2",
        ];
        for text in samples {
            let first = split_paragraphs(text);
            let rejoined = first.join("\n\n");
            let second = split_paragraphs(&rejoined);
            assert_eq!(first.len(), second.len(), "sample: {:?}", text);
            assert_eq!(first, second);
        }
    }
}
