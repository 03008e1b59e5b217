//! 模版编译缓存 - 业务能力层
//!
//! 把模版里的字符串正则编译成不可变的 `CompiledTemplate` 快照，
//! 以 (模版 ID, 解析字段指纹) 为键缓存。读多写少，查询只拿读锁；
//! 未命中时在锁外编译，再用一次写锁插入，重复插入以先到者为准。

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::{debug, warn};

use crate::models::template::{fields, Template};

/// 正则匹配标志
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFlags {
    pub case_insensitive: bool,
    pub dot_matches_new_line: bool,
}

impl PatternFlags {
    pub const PLAIN: Self = Self {
        case_insensitive: false,
        dot_matches_new_line: false,
    };
    pub const IGNORE_CASE: Self = Self {
        case_insensitive: true,
        dot_matches_new_line: false,
    };
    pub const IGNORE_CASE_DOT_ALL: Self = Self {
        case_insensitive: true,
        dot_matches_new_line: true,
    };

    /// 字段对应的匹配标志：选项区分大小写，解析允许 `.` 跨行，其余不区分大小写
    pub fn for_field(field: &str) -> Self {
        match field {
            fields::OPTION => Self::PLAIN,
            fields::EXPLANATION => Self::IGNORE_CASE_DOT_ALL,
            _ => Self::IGNORE_CASE,
        }
    }
}

/// 按给定标志编译一个正则
pub fn compile_pattern(pattern: &str, flags: PatternFlags) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .dot_matches_new_line(flags.dot_matches_new_line)
        .build()
}

/// 编译失败的字段按"无匹配"处理，只记录警告
fn compile_field(field: &'static str, pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    match compile_pattern(pattern, PatternFlags::for_field(field)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("⚠️ 模版字段 {} 的正则无法编译，按无匹配处理: {}", field, e);
            None
        }
    }
}

/// 编译后的模版快照
#[derive(Debug)]
pub struct CompiledTemplate {
    pub question_split: Option<Regex>,
    pub question_number: Option<Regex>,
    pub option: Option<Regex>,
    pub correct_answer_line: Option<Regex>,
    pub correct_answer_extract: Option<Regex>,
    pub explanation: Option<Regex>,
    pub has_discussion: bool,
    pub discussion_date: Option<Regex>,
    pub noise_lines: Vec<Regex>,
}

impl CompiledTemplate {
    /// 编译模版的全部字段
    pub fn compile(template: &Template) -> Self {
        let noise_lines = template
            .noise_line_patterns
            .iter()
            .filter_map(|p| compile_field(fields::NOISE_LINES, p))
            .collect();

        Self {
            question_split: compile_field(fields::QUESTION_SPLIT, &template.question_split_pattern),
            question_number: compile_field(
                fields::QUESTION_NUMBER,
                &template.question_number_pattern,
            ),
            option: compile_field(fields::OPTION, &template.option_pattern),
            correct_answer_line: compile_field(
                fields::CORRECT_ANSWER_LINE,
                &template.correct_answer_line_pattern,
            ),
            correct_answer_extract: compile_field(
                fields::CORRECT_ANSWER_EXTRACT,
                &template.correct_answer_extract_pattern,
            ),
            explanation: template
                .explanation_pattern
                .as_deref()
                .and_then(|p| compile_field(fields::EXPLANATION, p)),
            has_discussion: template.has_discussion,
            discussion_date: template
                .discussion_date_pattern
                .as_deref()
                .and_then(|p| compile_field(fields::DISCUSSION_DATE, p)),
            noise_lines,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TemplateKey {
    id: Option<i64>,
    fingerprint: u64,
}

impl TemplateKey {
    fn of(template: &Template) -> Self {
        Self {
            id: template.id,
            fingerprint: template.fingerprint(),
        }
    }
}

/// 模版编译缓存
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<TemplateKey, Arc<CompiledTemplate>>>,
}

static GLOBAL_CACHE: LazyLock<Arc<PatternCache>> = LazyLock::new(|| Arc::new(PatternCache::new()));

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享缓存
    ///
    /// 只增不减，适合模版数量有限的批处理；长期运行且频繁编辑模版时应定期 `clear`
    /// 或改用 `ExamParser::with_cache` 传入独立缓存。
    pub fn global() -> Arc<PatternCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// 读穿透：命中直接返回，否则编译并插入
    pub fn get_or_compile(&self, template: &Template) -> Arc<CompiledTemplate> {
        let key = TemplateKey::of(template);

        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(hit);
        }

        debug!("编译模版: {}", template.name);
        let compiled = Arc::new(CompiledTemplate::compile(template));

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert(compiled))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
