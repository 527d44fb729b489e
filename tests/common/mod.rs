//! 测试用的内存页面和文档服务

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use robot_order_submit::error::{AppError, AppResult, BrowserError, DocumentError};
use robot_order_submit::infrastructure::{OrderPage, PageTarget};
use robot_order_submit::models::Order;
use robot_order_submit::services::DocumentService;

/// 页面和文档服务共用的事件记录
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn count(log: &EventLog, event: &str) -> usize {
    log.lock().unwrap().iter().filter(|e| e.as_str() == event).count()
}

pub const CLICK_ORDER: &str = "click:button:has-text('ORDER')";
pub const CLICK_OK: &str = "click:button:has-text('OK')";
pub const CLICK_ORDER_ANOTHER: &str = "click:button:has-text('ORDER ANOTHER ROBOT')";

pub fn order(number: &str, head: &str, body: &str, legs: &str, address: &str) -> Order {
    Order {
        order_number: number.to_string(),
        head: head.to_string(),
        body: body.to_string(),
        legs: legs.to_string(),
        address: address.to_string(),
    }
}

struct SiteState {
    modal_visible: bool,
    receipt_visible: bool,
    /// 每个订单在第几次提交时出现回执，None 表示永远不出现
    plans: VecDeque<Option<usize>>,
    current_plan: Option<usize>,
    submits: usize,
    receipts_issued: usize,
}

/// 模拟下单网站
///
/// - 打开页面时显示弹窗
/// - 选择头部零件视为开始一个新订单，按计划决定第几次提交出现回执
/// - ORDER ANOTHER ROBOT 之后再次显示弹窗
pub struct FakeSite {
    state: Mutex<SiteState>,
    log: EventLog,
}

impl FakeSite {
    pub fn new(plans: Vec<Option<usize>>, log: EventLog) -> Self {
        Self {
            state: Mutex::new(SiteState {
                modal_visible: false,
                receipt_visible: false,
                plans: plans.into(),
                current_plan: None,
                submits: 0,
                receipts_issued: 0,
            }),
            log,
        }
    }

    /// 直接打开弹窗（用于测试弹窗处理）
    pub fn show_modal(&self) {
        self.state.lock().unwrap().modal_visible = true;
    }

    pub fn modal_visible(&self) -> bool {
        self.state.lock().unwrap().modal_visible
    }

    fn record(&self, event: String) {
        self.log.lock().unwrap().push(event);
    }
}

fn not_found(what: impl Into<String>) -> AppError {
    BrowserError::ElementNotFound(what.into()).into()
}

#[async_trait]
impl OrderPage for FakeSite {
    async fn goto(&self, url: &str) -> AppResult<()> {
        self.record(format!("goto:{}", url));
        let mut state = self.state.lock().unwrap();
        state.modal_visible = true;
        state.receipt_visible = false;
        Ok(())
    }

    async fn is_visible(&self, target: &PageTarget) -> AppResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(match target {
            PageTarget::Css(selector) if selector == "div#receipt" => state.receipt_visible,
            PageTarget::ButtonText(text) if text == "OK" => state.modal_visible,
            _ => true,
        })
    }

    async fn click(&self, target: &PageTarget) -> AppResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            match target {
                PageTarget::ButtonText(text) if text == "OK" => {
                    if !state.modal_visible {
                        return Err(not_found(target.to_string()));
                    }
                    state.modal_visible = false;
                }
                PageTarget::ButtonText(text) if text == "ORDER" => {
                    state.submits += 1;
                    if let Some(confirm_on) = state.current_plan {
                        if state.submits >= confirm_on {
                            state.receipt_visible = true;
                        }
                    }
                }
                PageTarget::ButtonText(text) if text == "ORDER ANOTHER ROBOT" => {
                    if !state.receipt_visible {
                        return Err(not_found(target.to_string()));
                    }
                    state.receipt_visible = false;
                    state.modal_visible = true;
                }
                _ => {}
            }
        }
        self.record(format!("click:{}", target));
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> AppResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            if selector == "select#head" {
                state.current_plan = state.plans.pop_front().flatten();
                state.submits = 0;
            }
        }
        self.record(format!("select:{}={}", selector, value));
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> AppResult<()> {
        self.record(format!("fill:{}={}", selector, value));
        Ok(())
    }

    async fn inner_html(&self, selector: &str) -> AppResult<String> {
        let mut state = self.state.lock().unwrap();
        if selector != "div#receipt" || !state.receipt_visible {
            return Err(not_found(selector));
        }
        state.receipts_issued += 1;
        Ok(format!(
            r#"<h3>Receipt</h3><p class="badge badge-success">RSB-ROBO-ORDER-{}</p>"#,
            state.receipts_issued
        ))
    }

    async fn screenshot(&self, path: &Path) -> AppResult<()> {
        std::fs::write(path, b"\x89PNG fake").map_err(|e| AppError::file(path, e))?;
        self.record(format!("screenshot:{}", file_name(path)));
        Ok(())
    }
}

/// 写纯文本文件代替 PDF 的文档服务
pub struct FakeDocuments {
    log: EventLog,
    fail_render: bool,
}

impl FakeDocuments {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_render: false,
        }
    }

    pub fn failing(log: EventLog) -> Self {
        Self {
            log,
            fail_render: true,
        }
    }
}

#[async_trait]
impl DocumentService for FakeDocuments {
    async fn html_to_pdf(&self, html: &str, output: &Path) -> AppResult<()> {
        if self.fail_render {
            return Err(DocumentError::InvalidImage("render disabled".to_string()).into());
        }
        std::fs::write(output, html).map_err(|e| AppError::file(output, e))?;
        self.log
            .lock()
            .unwrap()
            .push(format!("pdf:{}", file_name(output)));
        Ok(())
    }

    async fn append_images(&self, pdf: &Path, images: &[PathBuf]) -> AppResult<()> {
        let mut content = std::fs::read_to_string(pdf).map_err(|e| AppError::file(pdf, e))?;
        for image in images {
            if !image.exists() {
                return Err(AppError::file(
                    image,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing image"),
                ));
            }
            content.push_str(&format!("\n[image:{}]", file_name(image)));
        }
        std::fs::write(pdf, content).map_err(|e| AppError::file(pdf, e))?;
        self.log
            .lock()
            .unwrap()
            .push(format!("append:{}", file_name(pdf)));
        Ok(())
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn zip_entries(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

pub fn sorted_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|e| file_name(&e.unwrap().path()))
        .collect();
    names.sort();
    names
}
