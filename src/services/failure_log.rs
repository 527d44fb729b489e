//! 失败订单记录服务 - 业务能力层
//!
//! 只负责"把失败订单写进文件"，不关心流程

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 失败订单记录
///
/// 每个失败订单追加一行：时间 | 订单号 | 原因
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写入一条失败记录
    pub async fn write(&self, order_number: &str, reason: &str) -> AppResult<()> {
        debug!("记录失败订单: {} | {}", order_number, reason);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::file(&self.path, e))?;

        let line = format!(
            "{} | 订单 {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            order_number,
            reason
        );
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AppError::file(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| AppError::file(&self.path, e))?;

        Ok(())
    }
}
