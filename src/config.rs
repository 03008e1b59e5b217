/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 待解析的文本文档目录（已从 PDF 等格式中抽取出的 .txt）
    pub input_folder: String,
    /// 解析结果 JSON 输出目录
    pub output_folder: String,
    /// 模版 TOML 文件，未设置时使用内置模版
    pub template_file: Option<String>,
    /// 同时解析的文档数量
    pub max_concurrent_documents: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "input_text".to_string(),
            output_folder: "output_json".to_string(),
            template_file: None,
            max_concurrent_documents: 8,
            verbose_logging: false,
            output_log_file: "parse_log.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            input_folder: std::env::var("EXAM_INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("EXAM_OUTPUT_FOLDER").unwrap_or(default.output_folder),
            template_file: std::env::var("EXAM_TEMPLATE_FILE").ok().filter(|v| !v.trim().is_empty()).or(default.template_file),
            max_concurrent_documents: std::env::var("MAX_CONCURRENT_DOCUMENTS").ok().and_then(|v| v.parse().ok()).filter(|n: &usize| *n > 0).unwrap_or(default.max_concurrent_documents),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
