pub mod document_ctx;
pub mod exam_flow;

pub use document_ctx::DocumentCtx;
pub use exam_flow::{parse, parse_document, ExamParser};
