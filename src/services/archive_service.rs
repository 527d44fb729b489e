//! 归档服务 - 业务能力层
//!
//! 把一个目录下的文件打包成 zip

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, AppResult, ArchiveError};

/// 归档结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub archive_path: PathBuf,
    /// 压缩包内的文件名，按名称排序
    pub entries: Vec<String>,
}

/// 归档服务
pub trait ArchiveService: Send + Sync {
    /// 把 `folder` 下的全部文件打包到 `archive_path`
    fn archive_folder(&self, folder: &Path, archive_path: &Path) -> AppResult<ArchiveSummary>;
}

/// zip 归档
///
/// 只打包目录第一层的普通文件，已存在的压缩包会被覆盖
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveService for ZipArchiver {
    fn archive_folder(&self, folder: &Path, archive_path: &Path) -> AppResult<ArchiveSummary> {
        if !folder.is_dir() {
            return Err(ArchiveError::DirectoryNotFound(folder.display().to_string()).into());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(folder).map_err(|e| AppError::file(folder, e))? {
            let entry = entry.map_err(|e| AppError::file(folder, e))?;
            let path = entry.path();
            // 压缩包本身放在目录内时不能把自己打包进去
            if path.is_file() && path != archive_path {
                files.push(path);
            }
        }
        files.sort();

        if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AppError::file(parent, e))?;
        }

        let zip_failed = |source| ArchiveError::ZipFailed {
            path: archive_path.display().to_string(),
            source,
        };

        let archive = File::create(archive_path).map_err(|e| AppError::file(archive_path, e))?;
        let mut writer = ZipWriter::new(archive);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut entries = Vec::with_capacity(files.len());
        for path in &files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("添加到压缩包: {}", name);

            writer.start_file(name.as_str(), options).map_err(zip_failed)?;
            let mut source = File::open(path).map_err(|e| AppError::file(path, e))?;
            io::copy(&mut source, &mut writer).map_err(|e| AppError::file(path, e))?;
            entries.push(name);
        }

        writer.finish().map_err(zip_failed)?;

        info!(
            "🗜️ 已归档 {} 个文件到 {}",
            entries.len(),
            archive_path.display()
        );

        Ok(ArchiveSummary {
            archive_path: archive_path.to_path_buf(),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zip_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_archive_contains_exactly_folder_files() {
        let dir = tempfile::tempdir().unwrap();
        let receipts = dir.path().join("receipts");
        std::fs::create_dir_all(receipts.join("nested")).unwrap();
        std::fs::write(receipts.join("A_Order_1.pdf"), b"%PDF-1").unwrap();
        std::fs::write(receipts.join("A_Order_2.pdf"), b"%PDF-2").unwrap();
        std::fs::write(receipts.join("nested").join("skip.txt"), b"x").unwrap();

        let archive_path = dir.path().join("receipts.zip");
        let summary = ZipArchiver::new()
            .archive_folder(&receipts, &archive_path)
            .unwrap();

        let expected = vec!["A_Order_1.pdf".to_string(), "A_Order_2.pdf".to_string()];
        assert_eq!(summary.entries, expected);
        assert_eq!(zip_names(&archive_path), expected);
    }

    #[test]
    fn test_empty_folder_gives_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let receipts = dir.path().join("receipts");
        std::fs::create_dir_all(&receipts).unwrap();

        let archive_path = dir.path().join("receipts.zip");
        let summary = ZipArchiver::new()
            .archive_folder(&receipts, &archive_path)
            .unwrap();

        assert!(summary.entries.is_empty());
        assert!(zip_names(&archive_path).is_empty());
    }

    #[test]
    fn test_archive_inside_folder_is_not_self_included() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"a").unwrap();
        let archive_path = dir.path().join("all.zip");
        std::fs::write(&archive_path, b"old").unwrap();

        let summary = ZipArchiver::new()
            .archive_folder(dir.path(), &archive_path)
            .unwrap();
        assert_eq!(summary.entries, vec!["a.pdf".to_string()]);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ZipArchiver::new()
            .archive_folder(&dir.path().join("missing"), &dir.path().join("x.zip"))
            .unwrap_err();
        assert!(matches!(err, AppError::Archive(ArchiveError::DirectoryNotFound(_))));
    }
}
