use anyhow::Result;
use exam_parser::{commands, utils::logging, App, Config};
use std::path::Path;

const USAGE: &str = "用法:
  exam_parser                           批量解析输入目录下的 .txt 文档
  exam_parser analyze <sample.txt>      分析样本并输出建议模版
  exam_parser validate <template.toml>  校验模版文件
  exam_parser suggest-check <file.json> 清洗外部生成的建议模版";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            App::initialize(config).await?.run().await?;
        }
        [cmd, path] if cmd == "analyze" => {
            println!("{}", commands::analyze(Path::new(path))?);
        }
        [cmd, path] if cmd == "validate" => {
            commands::validate(Path::new(path))?;
        }
        [cmd, path] if cmd == "suggest-check" => {
            println!("{}", commands::suggest_check(Path::new(path))?);
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
