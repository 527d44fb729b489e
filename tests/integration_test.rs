use robot_order_submit::browser::{connect_to_browser, BrowserSession};
use robot_order_submit::config::BrowserMode;
use robot_order_submit::config::Config;
use robot_order_submit::infrastructure::{OrderPage, PageTarget};
use robot_order_submit::logger;
use robot_order_submit::services::{CsvOrderSource, OrderSource};
use robot_order_submit::workflow::navigate_to_order_form;
use robot_order_submit::App;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_download_orders() {
    // 初始化日志
    logger::init(true);

    let config = Config::from_env().expect("读取配置失败");
    let dir = tempfile::tempdir().unwrap();

    let source = CsvOrderSource::remote(config.orders_csv_url.clone(), dir.path().join("orders.csv"));
    let orders = source.fetch_orders().await.expect("下载订单失败");

    assert!(!orders.is_empty(), "订单文件应该包含订单");
    println!("找到 {} 个订单", orders.len());
}

#[tokio::test]
#[ignore]
async fn test_open_order_form() {
    logger::init(true);

    let config = Config::from_env().expect("读取配置失败");
    let session = BrowserSession::open(&config).await.expect("打开浏览器失败");

    navigate_to_order_form(session.page(), &config.order_form_url)
        .await
        .expect("打开下单页面失败");

    let head_visible = session
        .page()
        .is_visible(&PageTarget::css("select#head"))
        .await
        .expect("检查表单失败");
    assert!(head_visible, "下单表单应该可见");

    session.close().await.expect("关闭浏览器失败");
}

#[tokio::test]
#[ignore]
async fn test_full_run() {
    logger::init(true);

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::from_env().expect("读取配置失败");
    config.output_dir = dir.path().join("output");
    config.orders_csv_path = dir.path().join("orders.csv");
    config.output_log_file = dir.path().join("output.txt").display().to_string();

    let archive_path = config.archive_path();
    let app = App::initialize(config).await.expect("初始化失败");
    app.run().await.expect("批量下单失败");

    assert!(archive_path.exists(), "应该生成回执压缩包");
}

async fn count_page_targets(port: u16) -> usize {
    let (mut browser, handler) = connect_to_browser(port).await.expect("连接浏览器失败");
    let targets = browser.fetch_targets().await.expect("读取标签页失败");
    handler.abort();
    targets.iter().filter(|t| t.r#type == "page").count()
}

#[tokio::test]
#[ignore] // 需要以 --remote-debugging-port 启动的浏览器
async fn test_connect_mode_closes_own_pages() {
    logger::init(true);

    let mut config = Config::from_env().expect("读取配置失败");
    config.browser_mode = BrowserMode::Connect;
    let port = config.browser_debug_port;

    let before = count_page_targets(port).await;

    let session = BrowserSession::open(&config).await.expect("连接浏览器失败");
    assert_eq!(count_page_targets(port).await, before + 2);

    session.close().await.expect("关闭会话失败");
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    assert_eq!(count_page_targets(port).await, before);
}
