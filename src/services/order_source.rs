//! 订单数据源 - 业务能力层
//!
//! 只负责"拿到订单列表"，不关心浏览器

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, SourceError};
use crate::models::{load_orders_from_csv, Order};

/// 订单数据源
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// 按输入顺序返回全部订单
    async fn fetch_orders(&self) -> AppResult<Vec<Order>>;
}

/// CSV 订单数据源
///
/// 有下载地址时先下载（覆盖本地文件），再从本地文件解析
pub struct CsvOrderSource {
    url: Option<String>,
    csv_path: PathBuf,
}

impl CsvOrderSource {
    /// 从远程下载 CSV 到 `csv_path` 后解析
    pub fn remote(url: impl Into<String>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            url: Some(url.into()),
            csv_path: csv_path.into(),
        }
    }

    /// 直接读取本地 CSV
    pub fn local(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            url: None,
            csv_path: csv_path.into(),
        }
    }
}

#[async_trait]
impl OrderSource for CsvOrderSource {
    async fn fetch_orders(&self) -> AppResult<Vec<Order>> {
        if let Some(url) = &self.url {
            download_csv_file(url, &self.csv_path).await?;
        }
        load_orders_from_csv(&self.csv_path)
    }
}

/// 下载 CSV 文件，已存在时覆盖
pub async fn download_csv_file(url: &str, target: &Path) -> AppResult<()> {
    info!("📥 下载订单文件: {}", url);

    let download_failed = |source| SourceError::DownloadFailed {
        url: url.to_string(),
        source,
    };

    let bytes = reqwest::get(url)
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(download_failed)?
        .bytes()
        .await
        .map_err(download_failed)?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file(parent, e))?;
    }
    tokio::fs::write(target, &bytes)
        .await
        .map_err(|e| AppError::file(target, e))?;

    debug!("已保存 {} 字节到 {}", bytes.len(), target.display());
    Ok(())
}
