use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 订单数据源错误
    #[error("订单数据错误: {0}")]
    Source(#[from] SourceError),
    /// 文档（PDF / 截图）生成错误
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 归档错误
    #[error("归档错误: {0}")]
    Archive(#[from] ArchiveError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(#[source] chromiumoxide::error::CdpError),
    /// 创建页面失败
    #[error("创建页面失败: {0}")]
    PageCreationFailed(#[source] chromiumoxide::error::CdpError),
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(#[from] chromiumoxide::error::CdpError),
    /// 脚本返回值无法解析
    #[error("脚本返回值解析失败: {0}")]
    UnexpectedScriptResult(#[from] serde_json::Error),
    /// 页面元素不存在
    #[error("页面元素不存在: {0}")]
    ElementNotFound(String),
}

/// 订单数据源错误
#[derive(Debug, Error)]
pub enum SourceError {
    /// 下载 CSV 失败
    #[error("下载订单文件失败 ({url}): {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// CSV 解析失败
    #[error("解析订单文件失败: {0}")]
    CsvParseFailed(#[from] csv::Error),
    /// 订单号重复
    #[error("订单号重复: {0}")]
    DuplicateOrderNumber(String),
}

/// 文档生成错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 回执区域不存在或为空
    #[error("订单 {0} 的回执内容为空")]
    EmptyReceipt(String),
    /// 渲染 PDF 失败
    #[error("渲染 PDF 失败 ({path}): {source}")]
    RenderFailed {
        path: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 截图失败
    #[error("截图失败 ({path}): {source}")]
    ScreenshotFailed {
        path: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// PDF 读写或合并失败
    #[error("处理 PDF 失败 ({path}): {source}")]
    PdfFailed {
        path: String,
        #[source]
        source: lopdf::Error,
    },
    /// 图片解码或转码失败
    #[error("处理图片失败 ({path}): {source}")]
    ImageFailed {
        path: String,
        #[source]
        source: image::ImageError,
    },
    /// 图片尺寸无效
    #[error("图片尺寸无效: {0}")]
    InvalidImage(String),
}

/// 归档错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// 待归档目录不存在
    #[error("目录不存在: {0}")]
    DirectoryNotFound(String),
    /// 写入压缩包失败
    #[error("写入压缩包失败 ({path}): {source}")]
    ZipFailed {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件操作错误
    pub fn file(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(BrowserError::UnexpectedScriptResult(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Source(SourceError::CsvParseFailed(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
