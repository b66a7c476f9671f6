// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、模型、上传暂存、数据库、历史记录和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 生成式模型配置
    pub llm: LlmSettings,
    /// 上传暂存配置
    pub upload: UploadSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 历史记录配置
    pub history: HistorySettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// API 根路径
    pub api_prefix: String,
}

/// 生成式模型配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// 模型 API 密钥
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// 模型 API 基础URL
    pub api_base_url: String,
    /// 单次调用超时时间（秒）
    pub timeout_secs: u64,
    /// 瞬时故障的最大重试次数
    pub max_retries: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 上传暂存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// 暂存目录
    pub staging_dir: String,
    /// 请求体最大字节数
    pub max_bytes: usize,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 历史记录配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySettings {
    /// 是否在后台记录成功的提取结果
    pub record_extractions: bool,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、配置文件和环境变量（前缀 `MEDSCAN`，分隔符 `__`）
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("MEDSCAN").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.api_prefix", "/api")?
            .set_default("llm.model", "gemini-2.0-flash")?
            .set_default(
                "llm.api_base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("llm.timeout_secs", 60)?
            .set_default("llm.max_retries", 2)?
            .set_default("llm.initial_backoff_ms", 500)?
            .set_default("llm.max_backoff_ms", 8000)?
            .set_default("upload.staging_dir", "uploads")?
            .set_default("upload.max_bytes", 10 * 1024 * 1024)?
            .set_default("database.url", "sqlite://medscan.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("history.record_extractions", false)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}
