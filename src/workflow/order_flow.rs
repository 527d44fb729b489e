//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验订单 → 填写表单 → 预览
//! 2. 点击 ORDER → 检查回执，最多提交 3 次
//! 3. 成功：回执 PDF → 截图 → 截图追加到 PDF → ORDER ANOTHER ROBOT → 关闭弹窗
//! 4. 失败：记录后返回，不影响后续订单

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult, DocumentError};
use crate::infrastructure::{OrderPage, PageTarget};
use crate::models::{
    extract_receipt_id, part_model, ArtifactLayout, FieldAction, FormField, InvalidOrder, Order,
    ReceiptArtifact,
};
use crate::services::DocumentService;
use crate::workflow::navigation::dismiss_modal_if_visible;
use crate::workflow::order_ctx::OrderCtx;

/// 每个订单最多提交的次数
pub const MAX_SUBMIT_ATTEMPTS: usize = 3;

/// 回执区域
pub const RECEIPT_SELECTOR: &str = "div#receipt";

pub const PREVIEW_BUTTON_TEXT: &str = "Preview";
pub const ORDER_BUTTON_TEXT: &str = "ORDER";
pub const ORDER_ANOTHER_BUTTON_TEXT: &str = "ORDER ANOTHER ROBOT";

/// 提交状态
///
/// `Filling → Submitted → {Verified | Rejected}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// 正在填写表单
    Filling,
    /// 已点击 ORDER，等待检查回执
    Submitted { attempt: usize },
    /// 回执已出现
    Verified { attempts: usize },
    /// 提交次数用尽仍无回执
    Rejected { attempts: usize },
}

impl SubmissionState {
    /// 表单填写完成，进行第一次提交
    pub fn submitted(self) -> Self {
        match self {
            SubmissionState::Filling => SubmissionState::Submitted { attempt: 1 },
            other => other,
        }
    }

    /// 根据回执检查结果推进状态
    ///
    /// 没有回执且还有次数时进入下一次提交（不重新填写表单）
    pub fn after_check(self, receipt_visible: bool) -> Self {
        match self {
            SubmissionState::Submitted { attempt } if receipt_visible => {
                SubmissionState::Verified { attempts: attempt }
            }
            SubmissionState::Submitted { attempt } if attempt >= MAX_SUBMIT_ATTEMPTS => {
                SubmissionState::Rejected { attempts: attempt }
            }
            SubmissionState::Submitted { attempt } => SubmissionState::Submitted {
                attempt: attempt + 1,
            },
            other => other,
        }
    }

    /// 已经提交的次数
    pub fn attempts(self) -> usize {
        match self {
            SubmissionState::Filling => 0,
            SubmissionState::Submitted { attempt } => attempt,
            SubmissionState::Verified { attempts } | SubmissionState::Rejected { attempts } => {
                attempts
            }
        }
    }
}

/// 订单失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// 订单数据不合法，未提交
    Invalid(InvalidOrder),
    /// 提交若干次仍未出现回执
    NotConfirmed { attempts: usize },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Invalid(reason) => write!(f, "订单不合法: {}", reason),
            FailureReason::NotConfirmed { attempts } => {
                write!(f, "提交 {} 次均未出现回执", attempts)
            }
        }
    }
}

/// 订单处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 下单成功，产物已生成
    Success(ReceiptArtifact),
    /// 下单失败（批次继续）
    Failed(FailureReason),
}

/// 订单处理流程
///
/// - 编排单个订单的填写、提交、重试和产物生成
/// - 不持有页面，每次调用时传入
pub struct OrderFlow<'a> {
    documents: &'a dyn DocumentService,
    layout: ArtifactLayout,
    settle_delay: Duration,
}

impl<'a> OrderFlow<'a> {
    /// 创建新的订单处理流程
    pub fn new(
        documents: &'a dyn DocumentService,
        layout: ArtifactLayout,
        settle_delay: Duration,
    ) -> Self {
        Self {
            documents,
            layout,
            settle_delay,
        }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// 处理一个订单
    ///
    /// 提交失败返回 `ProcessResult::Failed`；页面操作或产物生成出错时返回 `Err`
    pub async fn run(
        &self,
        page: &dyn OrderPage,
        order: &Order,
        ctx: &OrderCtx,
    ) -> AppResult<ProcessResult> {
        if let Err(reason) = order.validate() {
            warn!("{} ⚠️ 订单数据不合法，跳过: {}", ctx, reason);
            return Ok(ProcessResult::Failed(FailureReason::Invalid(reason)));
        }

        info!("{} 📝 填写并提交表单...", ctx);
        self.fill_form(page, order, ctx).await?;

        match self.submit_with_retry(page, ctx).await? {
            SubmissionState::Verified { attempts } => {
                info!("{} ✓ 下单成功（第 {} 次提交）", ctx, attempts);
                let artifact = self
                    .create_receipt_artifact(page, &order.order_number)
                    .await?;

                info!("{} 点击 ORDER ANOTHER ROBOT...", ctx);
                page.click(&PageTarget::button(ORDER_ANOTHER_BUTTON_TEXT))
                    .await?;
                dismiss_modal_if_visible(page).await?;

                Ok(ProcessResult::Success(artifact))
            }
            state => {
                error!(
                    "{} ❌ 提交 {} 次均未出现回执，放弃该订单",
                    ctx,
                    state.attempts()
                );
                Ok(ProcessResult::Failed(FailureReason::NotConfirmed {
                    attempts: state.attempts(),
                }))
            }
        }
    }

    /// 按字段表填写表单，然后点击预览
    async fn fill_form(&self, page: &dyn OrderPage, order: &Order, ctx: &OrderCtx) -> AppResult<()> {
        debug!(
            "{} 头部: {:?}, 身体: {:?}",
            ctx,
            part_model(&order.head),
            part_model(&order.body)
        );

        for field in FormField::ALL {
            let value = order.value_for(field);
            match field.action(value) {
                FieldAction::Select { selector } => {
                    page.select_option(&selector, value.trim()).await?
                }
                FieldAction::Check { selector } => page.click(&PageTarget::Css(selector)).await?,
                FieldAction::Fill { selector } => page.fill(&selector, value).await?,
            }
        }

        page.click(&PageTarget::button(PREVIEW_BUTTON_TEXT)).await
    }

    /// 提交并检查回执，最多提交 `MAX_SUBMIT_ATTEMPTS` 次
    ///
    /// 重试时只重新点击 ORDER，不重新填写表单。
    /// 返回 `Verified` 或 `Rejected`
    pub async fn submit_with_retry(
        &self,
        page: &dyn OrderPage,
        ctx: &OrderCtx,
    ) -> AppResult<SubmissionState> {
        let order_button = PageTarget::button(ORDER_BUTTON_TEXT);
        let receipt = PageTarget::css(RECEIPT_SELECTOR);

        let mut state = SubmissionState::Filling.submitted();
        while let SubmissionState::Submitted { attempt } = state {
            debug!("{} 第 {}/{} 次提交", ctx, attempt, MAX_SUBMIT_ATTEMPTS);
            page.click(&order_button).await?;

            if !self.settle_delay.is_zero() {
                sleep(self.settle_delay).await;
            }

            let visible = page.is_visible(&receipt).await?;
            if !visible {
                warn!(
                    "{} 第 {}/{} 次提交未出现回执",
                    ctx, attempt, MAX_SUBMIT_ATTEMPTS
                );
            }
            state = state.after_check(visible);
        }

        Ok(state)
    }

    /// 生成订单产物：回执 PDF → 截图 → 截图追加到 PDF
    ///
    /// 任一步骤失败都直接返回错误
    pub async fn create_receipt_artifact(
        &self,
        page: &dyn OrderPage,
        order_number: &str,
    ) -> AppResult<ReceiptArtifact> {
        info!("[订单 #{}] 📄 生成回执 PDF...", order_number);

        let receipt_html = page.inner_html(RECEIPT_SELECTOR).await?;
        if receipt_html.trim().is_empty() {
            return Err(DocumentError::EmptyReceipt(order_number.to_string()).into());
        }

        let pdf_path = self.layout.pdf_path(order_number);
        ensure_parent_dir(&pdf_path).await?;
        self.documents.html_to_pdf(&receipt_html, &pdf_path).await?;

        info!("[订单 #{}] 📸 截图...", order_number);
        let screenshot_path = self.layout.screenshot_path(order_number);
        ensure_parent_dir(&screenshot_path).await?;
        page.screenshot(&screenshot_path).await?;

        info!("[订单 #{}] 📎 将截图追加到回执...", order_number);
        self.documents
            .append_images(&pdf_path, std::slice::from_ref(&screenshot_path))
            .await?;

        Ok(ReceiptArtifact {
            order_number: order_number.to_string(),
            pdf_path,
            screenshot_path,
            receipt_id: extract_receipt_id(&receipt_html),
        })
    }
}

async fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file(parent, e))?;
    }
    Ok(())
}
