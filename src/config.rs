use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "robot_order.toml";

/// 浏览器运行方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserMode {
    /// 启动一个新的无头浏览器
    Headless,
    /// 通过调试端口连接已打开的浏览器
    Connect,
}

impl BrowserMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "headless" => Some(BrowserMode::Headless),
            "connect" => Some(BrowserMode::Connect),
            _ => None,
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 订单 CSV 下载地址
    pub orders_csv_url: String,
    /// 订单 CSV 本地保存路径
    pub orders_csv_path: PathBuf,
    /// 下单页面 URL
    pub order_form_url: String,
    /// 输出目录（回执、截图、压缩包）
    pub output_dir: PathBuf,
    /// 产物文件名前缀
    pub file_prefix: String,
    /// 浏览器运行方式
    pub browser_mode: BrowserMode,
    /// 浏览器调试端口（connect 模式）
    pub browser_debug_port: u16,
    /// 浏览器可执行文件路径（headless 模式，可选）
    pub chrome_executable: Option<PathBuf>,
    /// 点击 ORDER 后等待页面渲染的时间（毫秒）
    pub settle_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            orders_csv_path: PathBuf::from("orders.csv"),
            order_form_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            output_dir: PathBuf::from("output"),
            file_prefix: "RobotSpareBin".to_string(),
            browser_mode: BrowserMode::Headless,
            browser_debug_port: 9222,
            chrome_executable: None,
            settle_delay_ms: 500,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：先读配置文件（若存在），再用环境变量覆盖
    ///
    /// 未指定路径时依次尝试 `ROBOT_ORDER_CONFIG` 和 `robot_order.toml`
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("ROBOT_ORDER_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if path.exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };

        base.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 仅使用默认值和环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取配置，缺失字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::file(path, e))?;
        Self::from_toml_str(&content, path)
    }

    fn from_toml_str(content: &str, path: &Path) -> AppResult<Self> {
        toml::from_str(content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    /// 用环境变量覆盖当前配置
    ///
    /// `lookup` 抽象了环境变量读取，便于测试
    pub fn with_env_overrides<F>(self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self;

        if let Some(v) = lookup("ORDERS_CSV_URL") {
            config.orders_csv_url = v;
        }
        if let Some(v) = lookup("ORDERS_CSV_PATH") {
            config.orders_csv_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("ORDER_FORM_URL") {
            config.order_form_url = v;
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("FILE_PREFIX") {
            config.file_prefix = v;
        }
        if let Some(v) = lookup("BROWSER_MODE") {
            config.browser_mode =
                BrowserMode::parse(&v).ok_or_else(|| parse_error("BROWSER_MODE", &v, "headless|connect"))?;
        }
        if let Some(v) = lookup("BROWSER_DEBUG_PORT") {
            config.browser_debug_port = v.parse().map_err(|_| parse_error("BROWSER_DEBUG_PORT", &v, "u16"))?;
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            config.chrome_executable = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("SETTLE_DELAY_MS") {
            config.settle_delay_ms = v.parse().map_err(|_| parse_error("SETTLE_DELAY_MS", &v, "u64"))?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            config.verbose_logging = v.parse().map_err(|_| parse_error("VERBOSE_LOGGING", &v, "bool"))?;
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            config.output_log_file = v;
        }

        Ok(config)
    }

    /// 回执 PDF 目录
    pub fn receipts_dir(&self) -> PathBuf {
        self.output_dir.join("receipts")
    }

    /// 截图目录
    pub fn screenshots_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }

    /// 最终压缩包路径
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join("receipts.zip")
    }

    /// 失败订单记录文件
    pub fn failure_log_path(&self) -> PathBuf {
        self.output_dir.join("failed_orders.txt")
    }
}

fn parse_error(var_name: &str, value: &str, expected_type: &str) -> AppError {
    ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    }
    .into()
}
