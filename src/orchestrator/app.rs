//! 应用入口 - 编排层
//!
//! 下载订单 → 打开浏览器会话 → 批量处理 → 关闭会话 → 输出统计

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::models::{ArtifactLayout, Order};
use crate::orchestrator::batch_processor::{BatchProcessor, BatchReport};
use crate::services::{ChromeDocumentService, CsvOrderSource, FailureLog, OrderSource, ZipArchiver};
use crate::utils::logging::{
    append_report_to_log_file, init_log_file, log_orders_loaded, log_startup, print_final_stats,
};
use crate::workflow::OrderFlow;

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(&config);

        Ok(Self { config })
    }

    /// 运行应用主逻辑（从配置的地址下载订单）
    pub async fn run(&self) -> Result<()> {
        let source = CsvOrderSource::remote(
            self.config.orders_csv_url.clone(),
            self.config.orders_csv_path.clone(),
        );
        self.run_with_source(&source).await
    }

    /// 使用指定的订单数据源运行
    pub async fn run_with_source(&self, source: &dyn OrderSource) -> Result<()> {
        let orders = source.fetch_orders().await.context("获取订单失败")?;

        if orders.is_empty() {
            warn!("⚠️ 订单文件中没有订单，程序结束");
            return Ok(());
        }
        log_orders_loaded(orders.len());

        let session = BrowserSession::open(&self.config)
            .await
            .context("打开浏览器会话失败")?;

        // 无论批次成功与否都关闭会话
        let outcome = self.process_orders(&session, &orders).await;
        if let Err(e) = session.close().await {
            warn!("关闭浏览器会话失败: {}", e);
        }

        if let Some(report) = outcome? {
            print_final_stats(&report, &self.config.output_log_file);
            append_report_to_log_file(&report, &self.config.output_log_file)
                .with_context(|| format!("无法写入日志文件: {}", self.config.output_log_file))?;
        }

        Ok(())
    }

    async fn process_orders(
        &self,
        session: &BrowserSession,
        orders: &[Order],
    ) -> Result<Option<BatchReport>> {
        let documents = ChromeDocumentService::new(session.render_page());
        let archiver = ZipArchiver::new();

        let layout = ArtifactLayout::new(
            self.config.receipts_dir(),
            self.config.screenshots_dir(),
            self.config.file_prefix.clone(),
        );
        let flow = OrderFlow::new(
            &documents,
            layout,
            Duration::from_millis(self.config.settle_delay_ms),
        );

        let processor = BatchProcessor::new(
            flow,
            &archiver,
            self.config.order_form_url.clone(),
            self.config.archive_path(),
        )
        .with_failure_log(FailureLog::new(self.config.failure_log_path()));

        info!("开始处理订单...");
        let report = processor.run(session.page(), orders).await?;
        Ok(report)
    }
}
