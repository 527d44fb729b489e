//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 下载订单、管理浏览器会话生命周期（打开一次、关闭一次）
//! - 组装文档服务、归档服务和订单流程
//!
//! ### `batch_processor` - 批量订单处理器
//! - 导航到下单页面
//! - 按输入顺序处理 `Vec<Order>`
//! - 最终归档、汇总统计
//!
//! ## 层次关系
//!
//! ```text
//! app (下载订单 + 浏览器会话)
//!     ↓
//! batch_processor (处理 Vec<Order>)
//!     ↓
//! workflow::OrderFlow (处理单个 Order)
//!     ↓
//! services (能力层：数据源 / 文档 / 归档 / 失败记录)
//!     ↓
//! infrastructure (基础设施：OrderPage / JsExecutor)
//! ```

pub mod app;
pub mod batch_processor;

pub use app::App;
pub use batch_processor::{BatchProcessor, BatchReport, FailedOrder};
