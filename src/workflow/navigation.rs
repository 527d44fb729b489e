//! 页面导航与弹窗处理

use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::{OrderPage, PageTarget};

/// 弹窗上的确认按钮文字
pub const MODAL_BUTTON_TEXT: &str = "OK";

/// 打开下单页面，有弹窗时关掉
pub async fn navigate_to_order_form(page: &dyn OrderPage, url: &str) -> AppResult<()> {
    info!("🌐 打开下单页面: {}", url);
    page.goto(url).await?;
    dismiss_modal_if_visible(page).await?;
    Ok(())
}

/// 弹窗可见时点击确认按钮
///
/// 先检查可见性，没有弹窗时不做任何操作。返回是否关闭了弹窗
pub async fn dismiss_modal_if_visible(page: &dyn OrderPage) -> AppResult<bool> {
    let button = PageTarget::button(MODAL_BUTTON_TEXT);

    if page.is_visible(&button).await? {
        info!("检测到弹窗，正在关闭...");
        page.click(&button).await?;
        Ok(true)
    } else {
        debug!("没有弹窗");
        Ok(false)
    }
}
