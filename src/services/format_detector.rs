//! 样本格式检测 - 业务能力层
//!
//! 对一小段样本文本按字段分组试探已知格式族，每组采用第一个命中的族，
//! 产出一份建议模版和逐字段的说明。任何一组都可能识别不出来，这只会体现在说明里。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::suggestion::SuggestedTemplate;
use crate::models::template::{fields, DEFAULT_DISCUSSION_DATE_PATTERN};

/// 未识别时说明文字的固定结尾
pub const MANUAL_INPUT_SUFFIX: &str = "请手动填写";

/// 一个格式族：检测正则 + 命中后建议的字段值
struct Family {
    detect: &'static str,
    suggest: &'static [(&'static str, &'static str)],
    hint: &'static str,
}

/// 一个字段组：说明写在 `hint_field` 下
struct FieldGroup {
    hint_field: &'static str,
    label: &'static str,
    families: &'static [Family],
}

static GROUPS: &[FieldGroup] = &[
    FieldGroup {
        hint_field: fields::QUESTION_SPLIT,
        label: "题号",
        families: &[
            Family {
                detect: r"(?m)(?:Topic\s+\d+\s*)?Question\s*#?\d+",
                suggest: &[
                    (fields::QUESTION_SPLIT, r"(?:^|\n)(?:Topic\s+\d+\s*)?Question\s*#?\d+"),
                    (fields::QUESTION_NUMBER, r"(?:Topic\s+\d+\s*)?Question\s*#?(\d+)\s*[:.)-]?\s*(.*)$"),
                ],
                hint: "检测到 ExamTopics 风格: \"Question #N\" 或 \"Topic X Question #N\"",
            },
            Family {
                detect: r"(?m)NEW QUESTION \d+",
                suggest: &[
                    (fields::QUESTION_SPLIT, r"(?:^|\n)NEW QUESTION \d+"),
                    (fields::QUESTION_NUMBER, r"NEW QUESTION (\d+)\s*[:.)-]?\s*(.*)$"),
                ],
                hint: "检测到 \"NEW QUESTION N\" 风格",
            },
            Family {
                detect: r"(?m)^Q\s*[.:]?\s*\d+",
                suggest: &[
                    (fields::QUESTION_SPLIT, r"(?:^|\n)Q\s*[.:]?\s*\d+"),
                    (fields::QUESTION_NUMBER, r"Q\s*[.:]?\s*(\d+)[:.)-]?\s*(.*)$"),
                ],
                hint: "检测到 \"Q. N\" / \"Q N\" 风格",
            },
            Family {
                detect: r"(?m)^\d+\)\s+",
                suggest: &[
                    (fields::QUESTION_SPLIT, r"(?:^|\n)\d+\)\s+"),
                    (fields::QUESTION_NUMBER, r"^(\d+)\)\s+(.*)$"),
                ],
                hint: "检测到 \"N) text\" 风格",
            },
            Family {
                detect: r"(?m)^\d+\.\s+\S",
                suggest: &[
                    (fields::QUESTION_SPLIT, r"(?:^|\n)\d+\.\s+"),
                    (fields::QUESTION_NUMBER, r"^(\d+)\.\s+(.*)$"),
                ],
                hint: "检测到 \"N. text\" 风格",
            },
            Family {
                detect: r"(?m)第\s*\d+\s*题",
                suggest: &[
                    (fields::QUESTION_SPLIT, r"(?:^|\n)第\s*\d+\s*题"),
                    (fields::QUESTION_NUMBER, r"第\s*(\d+)\s*题[:.：]?\s*(.*)$"),
                ],
                hint: "检测到中文 \"第N题\" 风格",
            },
        ],
    },
    FieldGroup {
        hint_field: fields::OPTION,
        label: "选项",
        families: &[
            Family {
                detect: r"(?m)^[A-F][).:][ \t]+",
                suggest: &[(fields::OPTION, r"^([A-F])[).:]\s+")],
                hint: "检测到 \"A. \" / \"A) \" / \"A: \" 风格选项",
            },
            Family {
                detect: r"(?m)^\([A-F]\)[ \t]+",
                suggest: &[(fields::OPTION, r"^\(([A-F])\)\s+")],
                hint: "检测到 \"(A) text\" 风格选项",
            },
            Family {
                detect: r"(?m)^[A-F]、",
                suggest: &[(fields::OPTION, r"^([A-F])、\s*")],
                hint: "检测到中文 \"A、\" 风格选项",
            },
        ],
    },
    FieldGroup {
        hint_field: fields::CORRECT_ANSWER_LINE,
        label: "答案",
        families: &[
            Family {
                detect: r"(?im)Correct\s*Answer[s]?\s*[:：-]",
                suggest: &[
                    (fields::CORRECT_ANSWER_LINE, r"Correct\s*Answer[s]?\s*[:：]"),
                    (
                        fields::CORRECT_ANSWER_EXTRACT,
                        r"Correct\s*Answer[s]?\s*[:：-]\s*([A-F](?:[,\s]*[A-F])*)(?:[^A-Za-z]|$)",
                    ),
                ],
                hint: "检测到 \"Correct Answer:\" 风格",
            },
            Family {
                detect: r"(?im)^Answer\s*[:：]",
                suggest: &[
                    (fields::CORRECT_ANSWER_LINE, r"Answer\s*[:：]"),
                    (
                        fields::CORRECT_ANSWER_EXTRACT,
                        r"Answer\s*[:：]\s*([A-F](?:[,\s]*[A-F])*)(?:[^A-Za-z]|$)",
                    ),
                ],
                hint: "检测到 \"Answer:\" 风格",
            },
            Family {
                detect: r"(?m)正确答案\s*[:：]",
                suggest: &[
                    (fields::CORRECT_ANSWER_LINE, r"正确答案\s*[:：]"),
                    (
                        fields::CORRECT_ANSWER_EXTRACT,
                        r"正确答案\s*[:：]\s*([A-F](?:[,\s]*[A-F])*)(?:[^A-Za-z]|$)",
                    ),
                ],
                hint: "检测到中文 \"正确答案：\" 风格",
            },
            Family {
                detect: r"(?m)答案\s*[:：]",
                suggest: &[
                    (fields::CORRECT_ANSWER_LINE, r"答案\s*[:：]"),
                    (
                        fields::CORRECT_ANSWER_EXTRACT,
                        r"答案\s*[:：]\s*([A-F](?:[,\s]*[A-F])*)(?:[^A-Za-z]|$)",
                    ),
                ],
                hint: "检测到中文 \"答案：\" 风格",
            },
        ],
    },
    FieldGroup {
        hint_field: fields::EXPLANATION,
        label: "解析",
        families: &[
            Family {
                detect: r"(?im)Explanation\s*[:-]",
                suggest: &[(fields::EXPLANATION, r"Explanation\s*[:-](.*)$")],
                hint: "检测到 \"Explanation:\" 风格",
            },
            Family {
                detect: r"(?m)解[析释]\s*[:：]",
                suggest: &[(fields::EXPLANATION, r"解[析释]\s*[:：](.*)$")],
                hint: "检测到中文 \"解析：\" 风格",
            },
            Family {
                detect: r"(?im)Analysis\s*[:：-]",
                suggest: &[(fields::EXPLANATION, r"Analysis\s*[:-](.*)$")],
                hint: "检测到 \"Analysis:\" 风格",
            },
        ],
    },
];

/// 每组每个族的检测正则，与 `GROUPS` 一一对应
static DETECTORS: LazyLock<Vec<Vec<Regex>>> = LazyLock::new(|| {
    GROUPS
        .iter()
        .map(|group| {
            group
                .families
                .iter()
                .map(|family| Regex::new(family.detect).expect("static regex"))
                .collect()
        })
        .collect()
});

static RE_DISCUSSION_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s+(?:year|month|week|day|hour|minute)s?\s+ago").expect("static regex")
});

fn set_field(suggestion: &mut SuggestedTemplate, field: &str, value: &str) {
    let slot = match field {
        fields::QUESTION_SPLIT => &mut suggestion.question_split_pattern,
        fields::QUESTION_NUMBER => &mut suggestion.question_number_pattern,
        fields::OPTION => &mut suggestion.option_pattern,
        fields::CORRECT_ANSWER_LINE => &mut suggestion.correct_answer_line_pattern,
        fields::CORRECT_ANSWER_EXTRACT => &mut suggestion.correct_answer_extract_pattern,
        fields::EXPLANATION => &mut suggestion.explanation_pattern,
        fields::DISCUSSION_DATE => &mut suggestion.discussion_date_pattern,
        _ => return,
    };
    *slot = Some(value.to_string());
}

/// 分析样本文本，推荐模版
///
/// # 参数
/// - `sample_text`: 一小段样本（几道题即可，不需要整份文档）
///
/// # 返回
/// 可能只填了一部分字段的建议模版；从不失败
pub fn analyze_sample(sample_text: &str) -> SuggestedTemplate {
    let mut suggestion = SuggestedTemplate::default();

    for (group, detectors) in GROUPS.iter().zip(DETECTORS.iter()) {
        let hit = group
            .families
            .iter()
            .zip(detectors)
            .find(|(_, re)| re.is_match(sample_text));

        match hit {
            Some((family, _)) => {
                for (field, value) in family.suggest {
                    set_field(&mut suggestion, field, value);
                }
                suggestion.set_hint(group.hint_field, family.hint);
            }
            None => {
                debug!("样本中未识别到{}格式", group.label);
                suggestion.set_hint(
                    group.hint_field,
                    format!("未识别到{}格式，{}", group.label, MANUAL_INPUT_SUFFIX),
                );
            }
        }
    }

    if RE_DISCUSSION_TIMESTAMP.is_match(sample_text) {
        suggestion.has_discussion = Some(true);
        suggestion.discussion_date_pattern = Some(DEFAULT_DISCUSSION_DATE_PATTERN.to_string());
        suggestion.set_hint(fields::HAS_DISCUSSION, "检测到讨论区时间戳（如 \"2 months ago\"）");
    } else {
        suggestion.has_discussion = Some(false);
        suggestion.set_hint(fields::HAS_DISCUSSION, "未检测到讨论区");
    }

    suggestion
}

/// 该字段的说明是否表示需要手动填写
pub fn needs_manual_input(suggestion: &SuggestedTemplate, field: &str) -> bool {
    suggestion
        .hint(field)
        .is_none_or(|hint| hint.ends_with(MANUAL_INPUT_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_detector_patterns_compile() {
        assert_eq!(DETECTORS.len(), GROUPS.len());
        for group in GROUPS {
            for family in group.families {
                for (_, value) in family.suggest {
                    assert!(Regex::new(value).is_ok(), "bad suggestion: {}", value);
                }
            }
        }
    }

    #[test]
    fn test_examtopics_sample() {
        let sample = "Question #7\nWhich is right?\nA. this\nB. that\nCorrect Answer: A";
        let s = analyze_sample(sample);
        assert_eq!(s.has_discussion, Some(false));
        assert!(s.question_split_pattern.as_deref().is_some_and(|p| !p.is_empty()));
        assert_eq!(s.option_pattern.as_deref(), Some(r"^([A-F])[).:]\s+"));
        assert!(s.correct_answer_extract_pattern.is_some());
        assert!(!needs_manual_input(&s, fields::QUESTION_SPLIT));
        assert!(!needs_manual_input(&s, fields::OPTION));
        assert!(!needs_manual_input(&s, fields::CORRECT_ANSWER_LINE));
        assert!(needs_manual_input(&s, fields::EXPLANATION));
        assert_eq!(s.explanation_pattern, None);
    }

    #[test]
    fn test_first_matching_family_wins() {
        // "1. text" 和 "第1题" 同时存在时按顺序取前者
        let s = analyze_sample("1. 第1题 内容\n(A) 甲\n答案：A\n解析：因为");
        assert_eq!(s.question_number_pattern.as_deref(), Some(r"^(\d+)\.\s+(.*)$"));
        assert_eq!(s.option_pattern.as_deref(), Some(r"^\(([A-F])\)\s+"));
        assert_eq!(s.correct_answer_line_pattern.as_deref(), Some(r"答案\s*[:：]"));
        assert_eq!(s.explanation_pattern.as_deref(), Some(r"解[析释]\s*[:：](.*)$"));
    }

    #[test]
    fn test_discussion_detected() {
        let s = analyze_sample("NEW QUESTION 3\nA) x\nAnswer: A\nbob 3 minutes ago");
        assert_eq!(s.has_discussion, Some(true));
        assert_eq!(
            s.discussion_date_pattern.as_deref(),
            Some(DEFAULT_DISCUSSION_DATE_PATTERN)
        );
        assert_eq!(s.correct_answer_line_pattern.as_deref(), Some(r"Answer\s*[:：]"));
    }

    #[test]
    fn test_nothing_recognised() {
        let s = analyze_sample("lorem ipsum");
        assert_eq!(s.question_split_pattern, None);
        assert_eq!(s.option_pattern, None);
        for field in [fields::QUESTION_SPLIT, fields::OPTION, fields::CORRECT_ANSWER_LINE, fields::EXPLANATION] {
            assert!(needs_manual_input(&s, field));
        }
    }
}
