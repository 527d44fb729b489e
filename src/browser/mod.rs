//! 浏览器会话
//!
//! 整个批次只打开一次浏览器，结束时显式关闭

pub mod connection;
pub mod headless;

use chromiumoxide::{Browser, Page};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{BrowserMode, Config};
use crate::error::{AppResult, BrowserError};
use crate::infrastructure::JsExecutor;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

/// 浏览器会话：浏览器 + 事件处理任务 + 下单页面 + 渲染页面
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    executor: JsExecutor,
    render_page: Page,
    mode: BrowserMode,
}

impl BrowserSession {
    /// 按配置启动或连接浏览器，并创建下单页面和渲染页面
    pub async fn open(config: &Config) -> AppResult<Self> {
        let (browser, handler) = match config.browser_mode {
            BrowserMode::Headless => {
                launch_headless_browser(config.chrome_executable.as_deref()).await?
            }
            BrowserMode::Connect => connect_to_browser(config.browser_debug_port).await?,
        };

        let page = open_blank_page(&browser).await?;
        let render_page = open_blank_page(&browser).await?;

        Ok(Self {
            browser,
            handler,
            executor: JsExecutor::new(page),
            render_page,
            mode: config.browser_mode,
        })
    }

    /// 下单页面
    pub fn page(&self) -> &JsExecutor {
        &self.executor
    }

    /// 渲染 PDF 用的页面，不影响下单页面
    ///
    /// 页面归会话所有，随会话一起关闭
    pub fn render_page(&self) -> Page {
        self.render_page.clone()
    }

    /// 关闭会话
    ///
    /// 自己启动的浏览器会被关闭；连接的浏览器只关闭本程序打开的两个页面
    pub async fn close(mut self) -> AppResult<()> {
        match self.mode {
            BrowserMode::Headless => {
                info!("关闭浏览器...");
                if let Err(e) = self.browser.close().await {
                    warn!("关闭浏览器失败: {}", e);
                }
                if let Err(e) = self.browser.wait().await {
                    warn!("等待浏览器进程退出失败: {}", e);
                }
            }
            BrowserMode::Connect => {
                debug!("断开浏览器连接，关闭本程序打开的页面");
                for page in [self.executor.page().clone(), self.render_page.clone()] {
                    if let Err(e) = page.close().await {
                        warn!("关闭页面失败: {}", e);
                    }
                }
            }
        }

        self.handler.abort();
        Ok(())
    }
}

async fn open_blank_page(browser: &Browser) -> AppResult<Page> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(BrowserError::PageCreationFailed)?;
    Ok(page)
}
