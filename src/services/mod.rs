pub mod block_parser;
pub mod discussion;
pub mod field_extractor;
pub mod format_detector;
pub mod option_extractor;
pub mod pattern_cache;
pub mod preprocessor;
pub mod segmenter;
pub mod template_validator;

pub use block_parser::parse_block;
pub use discussion::reconstruct_comments;
pub use format_detector::analyze_sample;
pub use pattern_cache::{CompiledTemplate, PatternCache};
pub use template_validator::{sanitize_suggestion, validate_template};
