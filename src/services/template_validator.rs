//! 模版校验 - 业务能力层
//!
//! 保存模版前校验所有正则能否编译；对外部产出的建议模版则逐字段清洗，
//! 无法编译的字段清空并留下说明，交给用户手动修正。

use tracing::warn;

use crate::error::TemplateError;
use crate::models::suggestion::SuggestedTemplate;
use crate::models::template::{fields, Template};
use crate::services::pattern_cache::{compile_pattern, PatternFlags};

/// 校验模版的全部正则
///
/// # 返回
/// 第一个无法编译的字段对应的 `TemplateError::InvalidPattern`
pub fn validate_template(template: &Template) -> Result<(), TemplateError> {
    for (field, pattern) in template.pattern_fields() {
        compile_pattern(pattern, PatternFlags::for_field(field))
            .map_err(|e| TemplateError::invalid_pattern(field, pattern, e))?;
    }

    for pattern in &template.noise_line_patterns {
        compile_pattern(pattern, PatternFlags::for_field(fields::NOISE_LINES))
            .map_err(|e| TemplateError::invalid_pattern(fields::NOISE_LINES, pattern.as_str(), e))?;
    }

    Ok(())
}

fn invalid_hint(pattern: &str) -> String {
    format!("⚠ 生成的正则无效，请手动修正: {}", pattern)
}

/// 清洗建议模版
///
/// 无法编译的单值字段被清空，并以该字段名记录说明；
/// 噪音行正则逐条过滤，被丢弃的条目合并成一条说明。
pub fn sanitize_suggestion(mut suggestion: SuggestedTemplate) -> SuggestedTemplate {
    let mut hints = Vec::new();

    for (field, slot) in suggestion.pattern_slots_mut() {
        let Some(pattern) = slot.as_deref() else {
            continue;
        };
        if let Err(e) = compile_pattern(pattern, PatternFlags::for_field(field)) {
            warn!("⚠️ 建议模版字段 {} 的正则无效: {}", field, e);
            hints.push((field, invalid_hint(pattern)));
            *slot = None;
        }
    }

    if let Some(patterns) = suggestion.noise_line_patterns.take() {
        let (valid, invalid): (Vec<String>, Vec<String>) = patterns
            .into_iter()
            .partition(|p| compile_pattern(p, PatternFlags::for_field(fields::NOISE_LINES)).is_ok());

        if !invalid.is_empty() {
            warn!("⚠️ 建议模版中有 {} 条噪音行正则无效", invalid.len());
            hints.push((fields::NOISE_LINES, invalid_hint(&invalid.join(" | "))));
        }
        suggestion.noise_line_patterns = Some(valid);
    }

    for (field, hint) in hints {
        suggestion.set_hint(field, hint);
    }

    suggestion
}
