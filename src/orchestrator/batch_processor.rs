//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是批量模式的入口，负责加载模版、扫描文档并发解析。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、加载并校验模版
//! 2. **批量加载**：扫描输入目录下的所有 `.txt` 文档
//! 3. **并发控制**：使用 Semaphore 限制同时解析的文档数量
//! 4. **全局统计**：汇总所有文档的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节
//! - **共享只读**：模版和解析器以 `Arc` 在任务间共享，任务之间没有可变状态
//! - **向下委托**：委托 document_processor 处理单个文档

use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{load_all_documents, load_template, Template, UploadedDocument};
use crate::orchestrator::document_processor::{process_document, DocumentOutcome};
use crate::services::template_validator::validate_template;
use crate::utils::logging::{init_log_file, log_documents_loaded, log_startup, print_final_stats};
use crate::workflow::{DocumentCtx, ExamParser};

/// 批量处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    /// 解析出至少一道题的文档数
    pub parsed: usize,
    /// 解析成功但没有题目的文档数
    pub empty: usize,
    pub failed: usize,
    /// 所有文档的题目总数
    pub questions: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    template: Arc<Template>,
    parser: Arc<ExamParser>,
}

impl App {
    /// 初始化应用
    ///
    /// 配置了模版文件则从文件加载，否则使用内置模版；模版中任一正则无法编译都会中止启动。
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        let template = match config.template_file.as_deref() {
            Some(path) => load_template(Path::new(path)).await?,
            None => Template::builtin(),
        };

        validate_template(&template)
            .with_context(|| format!("模版校验失败: {}", template.name))?;

        log_startup(config.max_concurrent_documents, &template.name);

        Ok(Self {
            config,
            template: Arc::new(template),
            parser: Arc::new(ExamParser::new()),
        })
    }

    /// 使用指定的解析器（测试中隔离缓存）
    pub fn with_parser(mut self, parser: ExamParser) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<BatchStats> {
        info!("\n📁 正在扫描待解析的文档...");
        let documents = load_all_documents(&self.config.input_folder).await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待解析的 .txt 文件，程序结束");
            return Ok(BatchStats::default());
        }

        log_documents_loaded(documents.len());

        let stats = self.process_all_documents(documents).await;

        print_final_stats(
            stats.parsed,
            stats.empty,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 并发处理所有文档
    async fn process_all_documents(&self, documents: Vec<UploadedDocument>) -> BatchStats {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_documents));
        let mut stats = BatchStats {
            total: documents.len(),
            ..Default::default()
        };

        let handles: Vec<_> = documents
            .into_iter()
            .enumerate()
            .map(|(idx, document)| {
                let ctx = DocumentCtx::new(idx + 1, document.original_name.clone());
                let semaphore = Arc::clone(&semaphore);
                let parser = Arc::clone(&self.parser);
                let template = Arc::clone(&self.template);
                let output_folder = self.config.output_folder.clone();
                let log_file = self.config.output_log_file.clone();

                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .context("并发信号量已关闭")?;
                    process_document(parser, template, document, ctx, &output_folder, &log_file)
                        .await
                })
            })
            .collect();

        for (idx, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(Ok(DocumentOutcome::Parsed(n))) => {
                    stats.parsed += 1;
                    stats.questions += n;
                }
                Ok(Ok(DocumentOutcome::Empty)) => stats.empty += 1,
                Ok(Err(e)) => {
                    error!("[文档 #{}] ❌ 处理失败: {:#}", idx + 1, e);
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("[文档 #{}] 任务执行失败: {}", idx + 1, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}
