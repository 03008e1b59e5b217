//! 文本预处理 - 业务能力层
//!
//! 统一换行符、逐行去除首尾空白与 URL、过滤噪音行和空行。

use regex::Regex;
use std::sync::LazyLock;

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static regex"));

/// 清理单行：去首尾空白、去 URL
pub fn clean_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    RE_URL.replace_all(trimmed, "").trim().to_string()
}

/// 规范化原始文本
///
/// # 参数
/// - `raw`: 抽取出的原始文本
/// - `noise_lines`: 模版的噪音行正则，命中的行整行丢弃
///
/// # 返回
/// 以单个 `\n` 连接的非空行；全空白输入返回空字符串
pub fn normalize(raw: &str, noise_lines: &[Regex]) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_lines.iter().any(|re| re.is_match(line)))
        .collect::<Vec<_>>()
        .join("\n")
}
