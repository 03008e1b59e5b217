//! 选项提取 - 业务能力层
//!
//! 在"题干+选项"区域内定位选项行，并把每个选项的续行拼接起来。

use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::models::exam::{AnswerOption, OptionLabel};

/// 一个选项起始行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionLine {
    /// 在区域内的行号
    pub index: usize,
    pub label: OptionLabel,
    /// 选项前缀（如 "A. "）在该行中的结束位置
    prefix_end: usize,
}

/// 定位所有选项行
///
/// 捕获组1 不是 A-F 单字母的行、或字母在本题已出现过的行，
/// 都不算新选项，按上一个选项的续行处理。
pub fn locate_options(lines: &[&str], option_re: &Regex) -> Vec<OptionLine> {
    let mut seen = HashSet::new();
    let mut located = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(caps) = option_re.captures(line) else {
            continue;
        };
        let Some(label) = caps.get(1).and_then(|m| OptionLabel::parse(m.as_str())) else {
            continue;
        };
        if !seen.insert(label) {
            debug!("选项 {} 重复出现，按续行处理: {}", label, line);
            continue;
        }
        let prefix_end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        located.push(OptionLine {
            index,
            label,
            prefix_end,
        });
    }

    located
}

/// 组装选项文本
///
/// 选项 i 覆盖从它的起始行到选项 i+1 起始行之前（最后一个到区域末尾），
/// 首行去掉前缀，各行以单个空格连接。
pub fn build_options(lines: &[&str], located: &[OptionLine]) -> Vec<AnswerOption> {
    located
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let end = located
                .get(i + 1)
                .map(|next| next.index)
                .unwrap_or(lines.len());

            let first = lines[current.index]
                .get(current.prefix_end..)
                .unwrap_or_default()
                .trim();
            let rest = lines[current.index + 1..end].join(" ");

            let text = [first, rest.as_str()]
                .into_iter()
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            AnswerOption {
                label: current.label,
                text,
            }
        })
        .collect()
}
