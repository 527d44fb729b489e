//! 批量订单处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **打开下单页面**：整个批次只导航一次，并关闭初始弹窗
//! 2. **顺序处理**：按输入顺序逐个委托 `OrderFlow`，不并发、不重排
//! 3. **失败隔离**：单个订单提交失败只记录，不中断批次
//! 4. **最终归档**：无论成功多少，最后都把回执目录打包
//! 5. **统计**：汇总成功 / 失败订单

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::OrderPage;
use crate::models::{Order, ReceiptArtifact};
use crate::services::{ArchiveService, ArchiveSummary, FailureLog};
use crate::utils::logging::log_order_start;
use crate::workflow::{navigate_to_order_form, FailureReason, OrderCtx, OrderFlow, ProcessResult};

/// 失败的订单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedOrder {
    pub order_number: String,
    pub reason: FailureReason,
}

/// 批次处理结果
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total: usize,
    /// 按输入顺序排列
    pub succeeded: Vec<ReceiptArtifact>,
    pub failed: Vec<FailedOrder>,
    pub archive: Option<ArchiveSummary>,
}

/// 批量订单处理器
pub struct BatchProcessor<'a> {
    flow: OrderFlow<'a>,
    archiver: &'a dyn ArchiveService,
    failure_log: Option<FailureLog>,
    order_form_url: String,
    archive_path: PathBuf,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(
        flow: OrderFlow<'a>,
        archiver: &'a dyn ArchiveService,
        order_form_url: impl Into<String>,
        archive_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            flow,
            archiver,
            failure_log: None,
            order_form_url: order_form_url.into(),
            archive_path: archive_path.into(),
        }
    }

    /// 把失败订单额外写入文件
    pub fn with_failure_log(mut self, failure_log: FailureLog) -> Self {
        self.failure_log = Some(failure_log);
        self
    }

    /// 处理一批订单
    ///
    /// 没有订单时直接返回 `None`，不导航也不归档
    pub async fn run(&self, page: &dyn OrderPage, orders: &[Order]) -> AppResult<Option<BatchReport>> {
        if orders.is_empty() {
            warn!("⚠️ 没有待处理的订单");
            return Ok(None);
        }

        navigate_to_order_form(page, &self.order_form_url).await?;

        let total = orders.len();
        let mut report = BatchReport {
            total,
            ..Default::default()
        };

        for (index, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(order.order_number.clone(), index + 1, total);
            log_order_start(&ctx, order);

            match self.flow.run(page, order, &ctx).await? {
                ProcessResult::Success(artifact) => {
                    info!("{} ✅ 回执: {}", ctx, artifact.pdf_path.display());
                    report.succeeded.push(artifact);
                }
                ProcessResult::Failed(reason) => {
                    self.record_failure(&order.order_number, &reason).await;
                    report.failed.push(FailedOrder {
                        order_number: order.order_number.clone(),
                        reason,
                    });
                }
            }
        }

        report.archive = Some(self.archive_receipts().await?);
        Ok(Some(report))
    }

    async fn record_failure(&self, order_number: &str, reason: &FailureReason) {
        if let Some(log) = &self.failure_log {
            if let Err(e) = log.write(order_number, &reason.to_string()).await {
                warn!("写入失败记录失败 ({}): {}", log.path().display(), e);
            }
        }
    }

    /// 打包回执目录
    ///
    /// 所有订单都失败时目录可能还不存在，此时生成一个空压缩包
    async fn archive_receipts(&self) -> AppResult<ArchiveSummary> {
        let receipts_dir = self.flow.layout().receipts_dir();
        tokio::fs::create_dir_all(receipts_dir)
            .await
            .map_err(|e| AppError::file(receipts_dir, e))?;

        info!("🗜️ 归档回执目录: {}", receipts_dir.display());
        self.archiver.archive_folder(receipts_dir, &self.archive_path)
    }
}
