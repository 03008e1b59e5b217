//! # Exam Parser
//!
//! 把题库文档（已抽取出的纯文本）按可配置的模版解析成结构化试卷
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 模版、试卷、建议模版、上传文档边界，以及文件加载器
//! - `Template` - 一组具名正则，决定如何定位题目、选项、答案、解析和讨论区
//! - `Exam` / `Question` / `Comment` - 解析产出
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个模块只处理一件事
//! - `PatternCache` - 模版编译缓存
//! - `preprocessor` / `segmenter` / `block_parser` - 预处理、分块、单块解析
//! - `discussion` - 讨论区评论重建
//! - `format_detector` / `template_validator` - 样本分析与模版校验
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份文本"的完整解析流程
//! - `ExamParser` - 预处理 → 分块 → 逐块解析
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发和统计
//! - `orchestrator/document_processor` - 单个文档处理器，解析并写出 JSON
//!
//! ## 模块结构

pub mod commands;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ParseError, SuggestionError, TemplateError};
pub use models::{
    AnswerOption, Comment, DocumentText, Exam, OptionLabel, Question, SuggestedTemplate, Template,
    UploadedDocument,
};
pub use orchestrator::{App, BatchStats};
pub use services::{analyze_sample, sanitize_suggestion, validate_template, PatternCache};
pub use workflow::{parse, parse_document, ExamParser};
