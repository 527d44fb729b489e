//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use std::fs::{self, OpenOptions};
use std::io::Write;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::Order;
use crate::orchestrator::BatchReport;
use crate::workflow::OrderCtx;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n机器人下单日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - RobotSpareBin 批量下单");
    info!("📥 订单来源: {}", config.orders_csv_url);
    info!("📂 输出目录: {}", config.output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录订单加载信息
pub fn log_orders_loaded(total: usize) {
    info!("✓ 找到 {} 个待处理的订单\n", total);
}

/// 记录单个订单开始处理
pub fn log_order_start(ctx: &OrderCtx, order: &Order) {
    info!("\n{} {}", ctx, "─".repeat(30));
    debug!(
        "{} 头部 {} | 身体 {} | 腿 {} | 地址 {}",
        ctx,
        order.head,
        order.body,
        order.legs,
        truncate_text(&order.address, 30)
    );
}

/// 打印最终统计信息
pub fn print_final_stats(report: &BatchReport, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.succeeded.len(), report.total);
    info!("❌ 失败: {}", report.failed.len());
    for failed in &report.failed {
        info!("   - 订单 {}: {}", failed.order_number, failed.reason);
    }
    if let Some(archive) = &report.archive {
        info!(
            "🗜️ 压缩包: {} ({} 个文件)",
            archive.archive_path.display(),
            archive.entries.len()
        );
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 把统计结果追加到日志文件
pub fn append_report_to_log_file(report: &BatchReport, log_file_path: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    writeln!(file, "成功: {}/{}", report.succeeded.len(), report.total)?;
    for artifact in &report.succeeded {
        writeln!(
            file,
            "  ✓ 订单 {} -> {} ({})",
            artifact.order_number,
            artifact.pdf_path.display(),
            artifact.receipt_id.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(file, "失败: {}", report.failed.len())?;
    for failed in &report.failed {
        writeln!(file, "  ✗ 订单 {}: {}", failed.order_number, failed.reason)?;
    }
    Ok(())
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
