use std::path::{Path, PathBuf};

use regex::Regex;

/// 一个成功订单的产物（回执 PDF + 截图）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptArtifact {
    pub order_number: String,
    /// 回执 PDF，最后一页是截图
    pub pdf_path: PathBuf,
    pub screenshot_path: PathBuf,
    /// 回执上的订单编号（RSB-ROBO-ORDER-…），页面上找不到时为 None
    pub receipt_id: Option<String>,
}

/// 产物文件的目录布局
///
/// 所有路径都由订单号确定，两个订单不会写到同一个文件
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    receipts_dir: PathBuf,
    screenshots_dir: PathBuf,
    prefix: String,
}

impl ArtifactLayout {
    pub fn new(
        receipts_dir: impl Into<PathBuf>,
        screenshots_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            receipts_dir: receipts_dir.into(),
            screenshots_dir: screenshots_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// 按 `<output>/receipts`、`<output>/screenshots` 的约定创建
    pub fn under(output_dir: &Path, prefix: impl Into<String>) -> Self {
        Self::new(
            output_dir.join("receipts"),
            output_dir.join("screenshots"),
            prefix,
        )
    }

    pub fn receipts_dir(&self) -> &Path {
        &self.receipts_dir
    }

    pub fn screenshots_dir(&self) -> &Path {
        &self.screenshots_dir
    }

    fn file_stem(&self, order_number: &str) -> String {
        format!("{}_Order_{}", self.prefix, order_number)
    }

    /// `receipts/<prefix>_Order_<n>.pdf`
    pub fn pdf_path(&self, order_number: &str) -> PathBuf {
        self.receipts_dir
            .join(format!("{}.pdf", self.file_stem(order_number)))
    }

    /// `screenshots/<prefix>_Order_<n>.png`
    pub fn screenshot_path(&self, order_number: &str) -> PathBuf {
        self.screenshots_dir
            .join(format!("{}.png", self.file_stem(order_number)))
    }
}

/// 从回执 HTML 中提取订单编号
pub fn extract_receipt_id(receipt_html: &str) -> Option<String> {
    let re = Regex::new(r"RSB-ROBO-ORDER-[A-Z0-9]+").ok()?;
    re.find(receipt_html).map(|m| m.as_str().to_string())
}
