//! rswappnext - Wappalyzer 兼容的 Web 技术指纹识别
//! 证据采集 → 信号评估 → 结果补全

pub mod config;
pub mod detector;
pub mod error;
pub mod evidence;
pub mod extractor;
pub mod report;
pub mod rule;

// 网络采集仅在 scanner 特性下编译
#[cfg(feature = "scanner")]
pub mod collector;

// 导出全局错误类型
pub use self::error::{RswResult, RswappError};

// 导出配置
pub use crate::config::{DataPaths, ScanConfig, ScanConfigBuilder, ScanType, DEFAULT_USER_AGENT};

// 导出检测入口
pub use crate::detector::{ScanResults, TechDetector};
pub use crate::evidence::EvidenceBuilder;
pub use crate::extractor::{DomSnapshot, HeaderConverter, HtmlExtractor, PageArtifacts};
pub use crate::report::{ReportFormat, ReportWriter};
pub use crate::rule::RuleLoader;

#[cfg(feature = "scanner")]
pub use crate::collector::{EvidenceCollector, FetchedPage, PageFetcher, ReqwestFetcher};

// 引擎常用类型
pub use rswappnext_engine::{
    EnrichedEntry, EnrichedResult, EvidenceBundle, EvidenceCategory, EvidenceMap, ResultEnricher,
    SignalEvaluator, SignatureDb, TechSignature, WappalyzerParser,
};
