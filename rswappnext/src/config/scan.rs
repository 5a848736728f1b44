//! 扫描配置管理
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RswappError;

/// 默认浏览器 UA
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0";

/// 扫描模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    /// 只用首个响应：不拉取外链脚本，不查 DNS / robots.txt
    Fast,
    /// 拉取外链脚本 + DNS + robots.txt
    #[default]
    Balanced,
    /// 浏览器渲染模式未实现，按 Balanced 执行
    Full,
}

impl ScanType {
    #[inline]
    pub fn is_fast(self) -> bool {
        self == ScanType::Fast
    }
}

impl FromStr for ScanType {
    type Err = RswappError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(ScanType::Fast),
            "balanced" => Ok(ScanType::Balanced),
            "full" => Ok(ScanType::Full),
            other => Err(RswappError::InvalidInput(format!(
                "未知扫描模式 `{}`（可选 fast / balanced / full）",
                other
            ))),
        }
    }
}

/// 技术库三件套路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    pub technologies: PathBuf,
    pub categories: PathBuf,
    pub groups: PathBuf,
}

impl DataPaths {
    /// 同一目录下的 technologies.json / categories.json / groups.json
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            technologies: dir.join("technologies.json"),
            categories: dir.join("categories.json"),
            groups: dir.join("groups.json"),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::from_dir("data")
    }
}

/// 完整扫描配置
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub scan_type: ScanType,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub cookie: Option<String>,
    /// 外链脚本并发拉取上限
    pub script_workers: usize,
    /// 多 URL 并发扫描上限
    pub threads: usize,
    pub data: DataPaths,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_type: ScanType::default(),
            http_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cookie: None,
            script_workers: 5,
            threads: 3,
            data: DataPaths::default(),
        }
    }
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }

    #[inline]
    pub fn is_fast(&self) -> bool {
        self.scan_type.is_fast()
    }
}

/// 链式构建器
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_type(mut self, scan_type: ScanType) -> Self {
        self.config.scan_type = scan_type;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.config.cookie = Some(cookie.into());
        self
    }

    pub fn script_workers(mut self, workers: usize) -> Self {
        self.config.script_workers = workers;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    pub fn data(mut self, data: DataPaths) -> Self {
        self.config.data = data;
        self
    }

    pub fn data_dir(self, dir: impl AsRef<Path>) -> Self {
        self.data(DataPaths::from_dir(dir))
    }

    /// 并发上限至少为 1
    pub fn build(mut self) -> ScanConfig {
        self.config.script_workers = self.config.script_workers.max(1);
        self.config.threads = self.config.threads.max(1);
        self.config
    }
}
