//! 基础设施层
//!
//! 持有浏览器页面，只暴露页面操作能力，不认识订单

pub mod js_executor;

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::error::AppResult;

pub use js_executor::JsExecutor;

/// 页面上的一个目标元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    /// CSS 选择器
    Css(String),
    /// 按按钮文字查找（包含匹配，忽略首尾空白）
    ButtonText(String),
}

impl PageTarget {
    pub fn css(selector: impl Into<String>) -> Self {
        PageTarget::Css(selector.into())
    }

    pub fn button(text: impl Into<String>) -> Self {
        PageTarget::ButtonText(text.into())
    }
}

impl fmt::Display for PageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageTarget::Css(selector) => write!(f, "{}", selector),
            PageTarget::ButtonText(text) => write!(f, "button:has-text('{}')", text),
        }
    }
}

/// 浏览器页面能力
///
/// 下单流程只依赖这个 trait，测试中用内存实现替换真实浏览器
#[async_trait]
pub trait OrderPage: Send + Sync {
    /// 打开 URL
    async fn goto(&self, url: &str) -> AppResult<()>;

    /// 元素是否存在且可见
    async fn is_visible(&self, target: &PageTarget) -> AppResult<bool>;

    /// 点击元素
    async fn click(&self, target: &PageTarget) -> AppResult<()>;

    /// 在下拉框中选择指定 value
    async fn select_option(&self, selector: &str, value: &str) -> AppResult<()>;

    /// 向输入框填写文本（覆盖原有内容）
    async fn fill(&self, selector: &str, value: &str) -> AppResult<()>;

    /// 读取元素的 innerHTML
    async fn inner_html(&self, selector: &str) -> AppResult<String>;

    /// 将当前页面截图保存为 PNG
    async fn screenshot(&self, path: &Path) -> AppResult<()>;
}
