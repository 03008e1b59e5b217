//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和并发调度，是批量模式的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载并校验模版
//! - 批量加载文档（Vec<UploadedDocument>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 在阻塞线程池中解析单个文档
//! - 写出试卷 JSON
//! - 记录单个文档的结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<UploadedDocument>)
//!     ↓
//! document_processor (处理单个 UploadedDocument)
//!     ↓
//! workflow::ExamParser (文本 → Exam)
//!     ↓
//! services (能力层：预处理 / 分块 / 块解析 / 讨论区)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，document_processor 管单个
//! 2. **向下依赖**：编排层 → workflow → services → models
//! 3. **无业务逻辑**：只做调度和统计，不做具体解析判断

pub mod batch_processor;
pub mod document_processor;

// 重新导出主要类型
pub use batch_processor::{App, BatchStats};
pub use document_processor::{process_document, DocumentOutcome};
