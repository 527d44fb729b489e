//! # Robot Order Submit
//!
//! 一个用于 RobotSpareBin 批量下单的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露页面操作能力
//! - `OrderPage` - 页面能力 trait；`JsExecutor` 是基于 chromiumoxide 的实现
//!
//! ### ② 业务能力层（Services）
//! - `OrderSource` - 下载并解析订单 CSV
//! - `DocumentService` - HTML → PDF、截图追加到 PDF
//! - `ArchiveService` - 回执目录打包 zip
//! - `FailureLog` - 记录失败订单
//!
//! ### ③ 流程层（Workflow）
//! - `OrderFlow` - 单个订单：填写 → 提交（最多 3 次）→ 回执产物
//! - `navigation` - 打开页面、关闭弹窗
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 浏览器会话生命周期
//! - `orchestrator/batch_processor` - 顺序处理订单并归档

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::BrowserSession;
pub use config::{BrowserMode, Config};
pub use error::{AppError, AppResult};
pub use infrastructure::{JsExecutor, OrderPage, PageTarget};
pub use models::{ArtifactLayout, Order, ReceiptArtifact};
pub use orchestrator::{App, BatchProcessor, BatchReport};
pub use workflow::{OrderCtx, OrderFlow, ProcessResult};
