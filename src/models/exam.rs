use serde::{Deserialize, Serialize};

/// 选项字母，固定为 A-F
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl OptionLabel {
    /// 从单个字母解析（不区分大小写）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLabel::A),
            'B' => Some(OptionLabel::B),
            'C' => Some(OptionLabel::C),
            'D' => Some(OptionLabel::D),
            'E' => Some(OptionLabel::E),
            'F' => Some(OptionLabel::F),
            _ => None,
        }
    }

    /// 从捕获文本解析，必须恰好是一个字母
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLabel::A => 'A',
            OptionLabel::B => 'B',
            OptionLabel::C => 'C',
            OptionLabel::D => 'D',
            OptionLabel::E => 'E',
            OptionLabel::F => 'F',
        }
    }
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: OptionLabel,
    pub text: String,
}

/// 讨论区中的一条评论
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user: String,
    /// 原样保留的时间短语（如 "2 months ago"），不转换为日期类型
    pub date: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
    pub is_highly_voted: bool,
    pub is_most_recent: bool,
}

/// 一道解析出的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub number: Option<u32>,
    pub text: String,
    pub options: Vec<AnswerOption>,
    /// 不保证唯一，也不校验是否属于 `options`
    pub correct_answers: Vec<OptionLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// 讨论区原文（已清理图标字形）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl Question {
    pub fn option_labels(&self) -> Vec<OptionLabel> {
        self.options.iter().map(|o| o.label).collect()
    }
}

/// 一次解析产出的试卷，题目顺序即文本中的出现顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub title: String,
    pub questions: Vec<Question>,
}

impl Exam {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// 所有题目的评论总数
    pub fn comment_count(&self) -> usize {
        self.questions
            .iter()
            .filter_map(|q| q.comments.as_ref())
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_label_parse() {
        assert_eq!(OptionLabel::parse("c"), Some(OptionLabel::C));
        assert_eq!(OptionLabel::parse(" F "), Some(OptionLabel::F));
        assert_eq!(OptionLabel::parse("G"), None);
        assert_eq!(OptionLabel::parse("AB"), None);
        assert_eq!(OptionLabel::parse(""), None);
    }

    #[test]
    fn test_question_serializes_camel_case() {
        let q = Question {
            number: Some(1),
            text: "Q".to_string(),
            options: vec![AnswerOption {
                label: OptionLabel::A,
                text: "x".to_string(),
            }],
            correct_answers: vec![OptionLabel::A],
            explanation: None,
            discussion: None,
            comments: None,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["correctAnswers"][0], "A");
        assert_eq!(json["options"][0]["label"], "A");
        assert!(json.get("explanation").is_none());
    }
}
