use crate::error::{AppError, FileError};
use crate::models::document::UploadedDocument;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;

/// 从文件夹中加载所有 .txt 文档
///
/// 按文件名排序，保证批处理编号稳定。单个文件读取失败只记录警告。
pub async fn load_all_documents(folder_path: &str) -> Result<Vec<UploadedDocument>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        })
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        tracing::info!("正在加载: {}", name);

        match fs::read(&path).await {
            Ok(bytes) => documents.push(UploadedDocument::new(bytes, name)),
            Err(e) => tracing::warn!("加载文件失败 {}: {}", path.display(), e),
        }
    }

    Ok(documents)
}
