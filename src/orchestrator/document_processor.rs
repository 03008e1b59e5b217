//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个上传文档，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **解析调度**：在阻塞线程池中调用 `ExamParser`（纯 CPU 计算）
//! 2. **结果输出**：把试卷写成格式化 JSON
//! 3. **零题目提示**：解析成功但没有题目时提醒检查模版
//! 4. **日志记录**：向日志文件追加一行处理结果

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::document::{title_from_name, UploadedDocument};
use crate::models::exam::Exam;
use crate::models::template::Template;
use crate::workflow::{DocumentCtx, ExamParser};

/// 零题目时给用户的提示
pub const EMPTY_RESULT_HINT: &str = "请确认所选模版与文档格式匹配";

/// 单个文档的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// 解析出若干道题
    Parsed(usize),
    /// 解析成功但没有任何题目
    Empty,
}

/// 处理单个文档
///
/// # 参数
/// - `parser`: 共享的解析器
/// - `template`: 本次批量使用的模版
/// - `document`: 上传的文档
/// - `ctx`: 文档上下文（用于日志）
/// - `output_folder`: JSON 输出目录
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 解析失败（空文档、文字为空等）以 `Err` 返回，由上层计入失败数
pub async fn process_document(
    parser: Arc<ExamParser>,
    template: Arc<Template>,
    document: UploadedDocument,
    ctx: DocumentCtx,
    output_folder: &str,
    log_file_path: &str,
) -> Result<DocumentOutcome> {
    info!("{} 开始解析 ({} 字节)", ctx, document.bytes.len());

    let exam = tokio::task::spawn_blocking(move || parser.parse_document(document, &template))
        .await
        .context("解析任务异常退出")?
        .with_context(|| format!("{} 解析失败", ctx))?;

    let output_path = write_exam(&exam, output_folder, &ctx.original_name).await?;

    let outcome = if exam.questions.is_empty() {
        warn!("{} ⚠️ 未解析出任何题目，{}", ctx, EMPTY_RESULT_HINT);
        DocumentOutcome::Empty
    } else {
        info!(
            "{} ✓ 解析出 {} 道题，{} 条评论",
            ctx,
            exam.question_count(),
            exam.comment_count()
        );
        DocumentOutcome::Parsed(exam.question_count())
    };

    append_log_line(log_file_path, &ctx, outcome, &output_path)?;
    info!("{} 💾 已写入 {}", ctx, output_path.display());

    Ok(outcome)
}

/// 将试卷写为 `<输出目录>/<标题>.json`
async fn write_exam(exam: &Exam, output_folder: &str, original_name: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_folder)
        .await
        .with_context(|| format!("无法创建输出目录: {}", output_folder))?;

    let path = Path::new(output_folder).join(format!("{}.json", title_from_name(original_name)));
    let json = serde_json::to_string_pretty(exam).context("试卷序列化失败")?;

    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("无法写入文件: {}", path.display()))?;

    Ok(path)
}

/// 向日志文件追加一行处理结果
fn append_log_line(
    log_file_path: &str,
    ctx: &DocumentCtx,
    outcome: DocumentOutcome,
    output_path: &Path,
) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;

    let line = match outcome {
        DocumentOutcome::Parsed(n) => format!("{} 题目 {} | {}\n", ctx, n, output_path.display()),
        DocumentOutcome::Empty => format!("{} 题目 0 | {}\n", ctx, EMPTY_RESULT_HINT),
    };
    file.write_all(line.as_bytes())?;

    Ok(())
}
