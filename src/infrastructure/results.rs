// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use crate::domain::models::export::ExportFormat;

/// 输出目录中的单个文件
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutputFile {
    /// 相对于输出目录的路径
    pub path: String,
    /// 文件大小（字节）
    pub size: u64,
}

#[derive(Debug)]
struct Entry {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
}

/// 递归遍历输出目录，跳过隐藏文件和隐藏目录
///
/// 爬虫使用 `--timestamped-output` 时会在输出目录下再建一层时间戳目录，
/// 所以这里必须递归。
async fn walk(root: &Path) -> std::io::Result<Vec<Entry>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let hidden = entry
                .file_name()
                .to_str()
                .map(|n| n.starts_with('.'))
                .unwrap_or(false);
            if hidden {
                continue;
            }

            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                let metadata = entry.metadata().await?;
                files.push(Entry {
                    path: entry.path(),
                    size: metadata.len(),
                    modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                });
            }
        }
    }
    Ok(files)
}

fn file_name_lower(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_ascii_lowercase())
}

/// 查找爬取的主结果文件
///
/// 优先匹配 `<export_type>.<ext>` 或 `*_<export_type>.<ext>`，
/// 找不到时退而选择任意 `*.<ext>` 文件；多个候选时取最近修改的一个。
pub async fn find_result_file(
    output_dir: &Path,
    export_type: &str,
    format: ExportFormat,
) -> std::io::Result<Option<PathBuf>> {
    let files = walk(output_dir).await?;

    let ext = format!(".{}", format.extension());
    let exact = format!("{}{}", export_type.to_ascii_lowercase(), ext);
    let suffix = format!("_{}", exact);

    let newest = |pred: &dyn Fn(&str) -> bool| {
        files
            .iter()
            .filter(|e| file_name_lower(&e.path).is_some_and(|n| pred(&n)))
            .max_by_key(|e| e.modified)
            .map(|e| e.path.clone())
    };

    let preferred = newest(&|name: &str| name == exact || name.ends_with(&suffix));
    Ok(preferred.or_else(|| newest(&|name: &str| name.ends_with(&ext))))
}

/// 列出输出目录中的所有文件，按相对路径排序
pub async fn list_output_files(output_dir: &Path) -> std::io::Result<Vec<OutputFile>> {
    let mut files: Vec<OutputFile> = walk(output_dir)
        .await?
        .into_iter()
        .map(|e| OutputFile {
            path: e
                .path
                .strip_prefix(output_dir)
                .unwrap_or(&e.path)
                .to_string_lossy()
                .replace('\\', "/"),
            size: e.size,
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
