//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，通过执行 JS 提供页面操作能力

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppResult, BrowserError, DocumentError};
use crate::infrastructure::{OrderPage, PageTarget};

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 实现 `OrderPage`，不认识 Order
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 给元素设置 value 并触发 input / change 事件
    ///
    /// 直接调用原型上的 setter，页面框架才能感知到值的变化
    async fn set_value(&self, selector: &str, value: &str, must_match_option: bool) -> AppResult<()> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return 'missing';
                const value = {value};
                if ({must_match_option} && !Array.from(el.options || []).some(o => o.value === value)) {{
                    return 'no-option';
                }}
                const setter = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value').set;
                setter.call(el, value);
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return 'ok';
            }})()
            "#,
            selector = serde_json::to_string(selector)?,
            value = serde_json::to_string(value)?,
            must_match_option = must_match_option,
        );

        match self.eval_as::<String>(js_code).await?.as_str() {
            "ok" => Ok(()),
            "no-option" => Err(BrowserError::ElementNotFound(format!(
                "{} option[value='{}']",
                selector, value
            ))
            .into()),
            _ => Err(BrowserError::ElementNotFound(selector.to_string()).into()),
        }
    }
}

/// 生成查找目标元素的 JS 表达式
fn find_expr(target: &PageTarget) -> AppResult<String> {
    let expr = match target {
        PageTarget::Css(selector) => {
            format!("document.querySelector({})", serde_json::to_string(selector)?)
        }
        PageTarget::ButtonText(text) => format!(
            r#"(() => {{
                const wanted = {}.toLowerCase();
                const buttons = Array.from(document.querySelectorAll('button'));
                return buttons.find(b => b.textContent.trim().toLowerCase() === wanted)
                    || buttons.find(b => b.textContent.toLowerCase().includes(wanted))
                    || null;
            }})()"#,
            serde_json::to_string(text)?
        ),
    };
    Ok(expr)
}

#[async_trait]
impl OrderPage for JsExecutor {
    async fn goto(&self, url: &str) -> AppResult<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|source| BrowserError::NavigationFailed {
                url: url.to_string(),
                source,
            })?;
        Ok(())
    }

    async fn is_visible(&self, target: &PageTarget) -> AppResult<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = {};
                if (!el) return false;
                const style = window.getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                return style.display !== 'none'
                    && style.visibility !== 'hidden'
                    && (rect.width > 0 || rect.height > 0);
            }})()
            "#,
            find_expr(target)?
        );
        self.eval_as::<bool>(js_code).await
    }

    async fn click(&self, target: &PageTarget) -> AppResult<()> {
        debug!("点击: {}", target);
        let js_code = format!(
            r#"
            (() => {{
                const el = {};
                if (!el) return false;
                el.click();
                return true;
            }})()
            "#,
            find_expr(target)?
        );

        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(BrowserError::ElementNotFound(target.to_string()).into())
        }
    }

    async fn select_option(&self, selector: &str, value: &str) -> AppResult<()> {
        debug!("选择 {} = {}", selector, value);
        self.set_value(selector, value, true).await
    }

    async fn fill(&self, selector: &str, value: &str) -> AppResult<()> {
        debug!("填写 {} = {}", selector, value);
        self.set_value(selector, value, false).await
    }

    async fn inner_html(&self, selector: &str) -> AppResult<String> {
        let js_code = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.innerHTML : null; }})()",
            serde_json::to_string(selector)?
        );

        self.eval_as::<Option<String>>(js_code)
            .await?
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()).into())
    }

    async fn screenshot(&self, path: &Path) -> AppResult<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|source| DocumentError::ScreenshotFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(())
    }
}
