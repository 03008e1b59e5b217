//! 讨论区重建 - 业务能力层
//!
//! 把题目块中答案行之后的自由文本还原成有序的评论列表。
//!
//! 评论之间没有固定分隔符，唯一的锚点是每条评论作者行附近的相对时间短语
//! （如 "2 years, 1 month ago"）。扫描器自左向右逐行处理，维护两份状态：
//!
//! - `pending_lines`：自上一个日期锚点以来累积的行
//! - `active`：正在收集内容的评论（作者、日期、徽章已确定）
//!
//! 遇到日期锚点时，作者信息可能在同一行（锚点前缀），也可能在上面单独一行，
//! 此时要从 `pending_lines` 末尾回退弹出作者行和徽章行；剩下的缓冲区才是上一条评论的正文。

use phf::phf_map;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::exam::Comment;

/// 作者名为空时的占位
pub const ANONYMOUS: &str = "Anonymous";

const HIGHLY_VOTED: &str = "Highly Voted";
const MOST_RECENT: &str = "Most Recent";

/// PDF 抽取出的图标字体私有区字形
static GLYPHS: phf::Map<char, &'static str> = phf_map! {
    '\u{f147}' => "",
    '\u{f007}' => "👤 ",
    '\u{f086}' => "💬 ",
    '\u{f0a3}' => "• ",
    // 点赞图标直接移除，票数从 "upvoted N times" 文本中取
    '\u{f164}' => "",
};

static RE_SELECTED_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Selected Answer:\s*([A-F](?:[,\t ]*[A-F])*)(?:[^A-Za-z]|$)")
        .expect("static regex")
});
static RE_VOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)upvoted\s+(\d+)\s+times?$").expect("static regex"));
static RE_ICON_ONLY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s👤]*$").expect("static regex"));
static RE_USER_LEADING_ICONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[👤\s]+").expect("static regex"));
static RE_USER_STRAY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[|\u{2261}]").expect("static regex"));

/// 替换图标字形
pub fn clean_glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match GLYPHS.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

/// 徽章标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Badges {
    highly_voted: bool,
    most_recent: bool,
}

impl Badges {
    fn detect(line: &str) -> Self {
        Self {
            highly_voted: line.contains(HIGHLY_VOTED),
            most_recent: line.contains(MOST_RECENT),
        }
    }

    fn any(self) -> bool {
        self.highly_voted || self.most_recent
    }

    fn strip(line: &str) -> String {
        line.replace(HIGHLY_VOTED, "").replace(MOST_RECENT, "")
    }
}

/// 已确定作者和日期、尚未收齐正文的评论
#[derive(Debug, Clone)]
struct ActiveComment {
    user: String,
    date: String,
    badges: Badges,
}

/// 讨论区扫描器
#[derive(Debug)]
pub struct DiscussionScanner<'a> {
    date_anchor: &'a Regex,
    pending_lines: Vec<String>,
    active: Option<ActiveComment>,
    comments: Vec<Comment>,
}

impl<'a> DiscussionScanner<'a> {
    pub fn new(date_anchor: &'a Regex) -> Self {
        Self {
            date_anchor,
            pending_lines: Vec::new(),
            active: None,
            comments: Vec::new(),
        }
    }

    /// 处理一行
    pub fn push_line(&mut self, raw_line: &str) {
        let line = clean_glyphs(raw_line).trim().to_string();
        if line.is_empty() {
            return;
        }

        let Some(anchor) = self.date_anchor.find(&line) else {
            self.pending_lines.push(line);
            return;
        };

        let date = anchor.as_str().to_string();
        let prefix = line[..anchor.start()].trim();
        let suffix = line[anchor.end()..].trim();

        let (user, badges) = self.resolve_author(prefix);
        self.drop_icon_residue();
        let user = clean_user(&user);

        self.finalize_active();

        debug!("评论锚点: {} @ {}", user, date);
        self.active = Some(ActiveComment { user, date, badges });
        if !suffix.is_empty() {
            self.pending_lines.push(suffix.to_string());
        }
    }

    /// 结束扫描，收尾最后一条评论
    pub fn finish(mut self) -> Vec<Comment> {
        self.finalize_active();
        self.comments
    }

    /// 确定作者名和徽章
    ///
    /// 前缀非空时作者就在日期行上；否则从缓冲区末尾回退：
    /// 末行带徽章时它是徽章行，作者在再往上一行（徽章行本身带名字时直接用）。
    fn resolve_author(&mut self, prefix: &str) -> (String, Badges) {
        if !prefix.is_empty() {
            let badges = Badges::detect(prefix);
            let user = if badges.any() {
                Badges::strip(prefix).trim().to_string()
            } else {
                prefix.to_string()
            };
            return (user, badges);
        }

        let Some(last) = self.pending_lines.pop() else {
            return (String::new(), Badges::default());
        };

        let badges = Badges::detect(&last);
        if !badges.any() {
            return (last, badges);
        }

        let remainder = strip_user_noise(&Badges::strip(&last));
        if !remainder.is_empty() {
            return (remainder, badges);
        }
        let user = self.pending_lines.pop().unwrap_or_default();
        (user, badges)
    }

    /// 弹出缓冲区末尾只剩图标或空白的行，它们属于作者块而不是上一条评论
    fn drop_icon_residue(&mut self) {
        while self
            .pending_lines
            .last()
            .is_some_and(|l| RE_ICON_ONLY_LINE.is_match(l))
        {
            self.pending_lines.pop();
        }
    }

    /// 用缓冲区收尾当前评论并清空缓冲区
    fn finalize_active(&mut self) {
        let raw = std::mem::take(&mut self.pending_lines).join("\n");
        let Some(active) = self.active.take() else {
            return;
        };

        let extracted = extract_content(&raw);
        self.comments.push(Comment {
            user: active.user,
            date: active.date,
            content: extracted.content,
            selected_answer: extracted.selected_answer,
            vote_count: extracted.vote_count,
            is_highly_voted: active.badges.highly_voted,
            is_most_recent: active.badges.most_recent,
        });
    }
}

/// 去掉作者名开头的图标以及 `|`、`≡`
fn strip_user_noise(raw: &str) -> String {
    let without_icons = RE_USER_LEADING_ICONS.replace(raw, "");
    RE_USER_STRAY_CHARS
        .replace_all(&without_icons, "")
        .trim()
        .to_string()
}

/// 清理作者名，为空时用占位名
fn clean_user(raw: &str) -> String {
    let cleaned = strip_user_noise(raw);
    if cleaned.is_empty() {
        ANONYMOUS.to_string()
    } else {
        cleaned
    }
}

/// 评论正文拆分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent {
    pub content: String,
    pub selected_answer: Option<String>,
    pub vote_count: Option<u32>,
}

/// 从正文中取出 `Selected Answer: X` 和末尾的 `upvoted N times`
pub fn extract_content(raw: &str) -> CommentContent {
    let mut content = raw.trim().to_string();

    // 只去掉 "Selected Answer: X" 本身，保留用于判定边界的后一个字符
    let selected = RE_SELECTED_ANSWER.captures(&content).and_then(|caps| {
        let whole = caps.get(0)?;
        let letters = caps.get(1)?;
        Some((whole.start()..letters.end(), letters.as_str().trim().to_string()))
    });
    let selected_answer = selected.map(|(range, letters)| {
        content.replace_range(range, "");
        content = content.trim().to_string();
        letters
    });

    let votes = RE_VOTES.captures(&content).and_then(|caps| {
        let whole = caps.get(0)?;
        let count = caps.get(1)?.as_str().parse::<u32>().ok()?;
        Some((whole.range(), count))
    });
    let vote_count = votes.map(|(range, count)| {
        content.replace_range(range, "");
        content = content.trim().to_string();
        count
    });

    CommentContent {
        content,
        selected_answer,
        vote_count,
    }
}

/// 重建讨论区评论
///
/// 没有任何日期锚点时返回空列表，原文仍由调用方保留在 `discussion` 字段。
pub fn reconstruct_comments(discussion: &str, date_anchor: &Regex) -> Vec<Comment> {
    let mut scanner = DiscussionScanner::new(date_anchor);
    for line in discussion.lines() {
        scanner.push_line(line);
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::DEFAULT_DISCUSSION_DATE_PATTERN;

    fn anchor() -> Regex {
        regex::RegexBuilder::new(DEFAULT_DISCUSSION_DATE_PATTERN)
            .case_insensitive(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_glyphs_replaced() {
        assert_eq!(clean_glyphs("\u{f007}bob \u{f164}"), "👤 bob ");
        assert_eq!(clean_glyphs("\u{f086}x\u{f0a3}y\u{f147}"), "💬 x• y");
    }

    #[test]
    fn test_author_on_date_line() {
        let text = "alice Highly Voted 2 years, 1 month ago\nSelected Answer: BC\nB and C are right\nupvoted 12 times\nbob 1 year ago\nagree";
        let comments = reconstruct_comments(text, &anchor());
        assert_eq!(comments.len(), 2);

        let first = &comments[0];
        assert_eq!(first.user, "alice");
        assert_eq!(first.date, "2 years, 1 month ago");
        assert!(first.is_highly_voted);
        assert!(!first.is_most_recent);
        assert_eq!(first.selected_answer.as_deref(), Some("BC"));
        assert_eq!(first.vote_count, Some(12));
        assert_eq!(first.content, "B and C are right");

        let second = &comments[1];
        assert_eq!(second.user, "bob");
        assert_eq!(second.date, "1 year ago");
        assert_eq!(second.content, "agree");
        assert_eq!(second.vote_count, None);
    }

    #[test]
    fn test_author_and_badge_on_lines_above_date() {
        let text = "\u{f007}\ncarol\nMost Recent\n3 months ago\nfirst comment body\n\u{f007}\ndave\n2 weeks ago\nsecond body";
        let comments = reconstruct_comments(text, &anchor());
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].user, "carol");
        assert!(comments[0].is_most_recent);
        assert_eq!(comments[0].content, "first comment body");
        assert_eq!(comments[1].user, "dave");
        assert!(!comments[1].is_most_recent);
        assert_eq!(comments[1].content, "second body");
    }

    #[test]
    fn test_badge_line_with_name() {
        let text = "body before\n|eve Highly Voted\n5 days ago\nhello";
        let comments = reconstruct_comments(text, &anchor());
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user, "eve");
        assert!(comments[0].is_highly_voted);
        assert_eq!(comments[0].content, "hello");
    }

    #[test]
    fn test_named_badge_line_leaves_previous_body_intact() {
        let text = "bob 3 days ago\nprev body\nupvoted 5 times\ncarol Highly Voted\n2 days ago\nhi";
        let comments = reconstruct_comments(text, &anchor());
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].user, "bob");
        assert_eq!(comments[0].content, "prev body");
        assert_eq!(comments[0].vote_count, Some(5));
        assert_eq!(comments[1].user, "carol");
        assert!(comments[1].is_highly_voted);
    }

    #[test]
    fn test_missing_author_defaults_to_anonymous() {
        let comments = reconstruct_comments("4 hours ago\ntext", &anchor());
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user, ANONYMOUS);
        assert_eq!(comments[0].content, "text");
    }

    #[test]
    fn test_no_anchor_yields_no_comments() {
        assert!(reconstruct_comments("just some text\nno dates", &anchor()).is_empty());
    }

    #[test]
    fn test_n_anchors_give_n_ordered_non_overlapping_comments() {
        let n = 6;
        let text: String = (0..n)
            .map(|i| format!("user{i} {} days ago\ncontent number {i}\n", i + 1))
            .collect();
        let comments = reconstruct_comments(&text, &anchor());
        assert_eq!(comments.len(), n);
        for (i, c) in comments.iter().enumerate() {
            assert_eq!(c.user, format!("user{i}"));
            assert_eq!(c.content, format!("content number {i}"));
        }
    }

    #[test]
    fn test_text_after_date_starts_content() {
        let comments = reconstruct_comments("frank 2 days ago I think A\nbecause", &anchor());
        assert_eq!(comments[0].content, "I think A\nbecause");
    }

    #[test]
    fn test_extract_content_round_trip() {
        let extracted = extract_content("Selected Answer: BC\nreasoning here\nupvoted 12 times");
        assert_eq!(extracted.selected_answer.as_deref(), Some("BC"));
        assert_eq!(extracted.vote_count, Some(12));
        assert_eq!(extracted.content, "reasoning here");
    }

    #[test]
    fn test_selected_answer_does_not_swallow_next_line() {
        let extracted = extract_content("Selected Answer: A\nAgree with this");
        assert_eq!(extracted.selected_answer.as_deref(), Some("A"));
        assert_eq!(extracted.content, "Agree with this");
    }

    #[test]
    fn test_vote_phrase_only_removed_at_end() {
        let extracted = extract_content("upvoted 3 times but more text");
        assert_eq!(extracted.vote_count, None);
        assert_eq!(extracted.content, "upvoted 3 times but more text");
    }
}
