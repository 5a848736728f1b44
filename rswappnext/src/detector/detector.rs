//! 技术检测器
//! 核心职责：
//! 1. 持有只读签名库（Arc 共享，多任务并发检测无需加锁）
//! 2. 证据包 → 信号评估 → 结果补全
//! 3. 离线检测（已有响应）与在线扫描（scanner 特性）两类入口
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use http::header::HeaderMap;
use log::{debug, info};
use rswappnext_engine::{EnrichedResult, EvidenceBundle, ResultEnricher, SignalEvaluator, SignatureDb};

use crate::config::ScanConfig;
use crate::error::RswResult;
use crate::evidence::EvidenceBuilder;
use crate::rule::RuleLoader;

#[cfg(feature = "scanner")]
use crate::collector::EvidenceCollector;
#[cfg(feature = "scanner")]
use crate::error::RswappError;
#[cfg(feature = "scanner")]
use url::Url;

/// URL → 检测结果
pub type ScanResults = BTreeMap<String, EnrichedResult>;

#[derive(Clone)]
pub struct TechDetector {
    db: Arc<SignatureDb>,
    config: ScanConfig,
    #[cfg(feature = "scanner")]
    collector: Option<Arc<EvidenceCollector>>,
}

impl TechDetector {
    /// 使用已加载的签名库创建检测器（不具备网络采集能力）
    pub fn new(db: Arc<SignatureDb>, config: ScanConfig) -> Self {
        Self {
            db,
            config,
            #[cfg(feature = "scanner")]
            collector: None,
        }
    }

    /// 按配置加载签名库；开启 scanner 特性时同时创建网络采集器
    pub fn from_config(config: ScanConfig) -> RswResult<Self> {
        let start = Instant::now();
        let db = RuleLoader::new().load(&config.data)?;
        info!("Detector ready in {:?} | techs: {}", start.elapsed(), db.len());

        #[allow(unused_mut)]
        let mut detector = Self::new(Arc::new(db), config);
        #[cfg(feature = "scanner")]
        {
            let collector = EvidenceCollector::from_config(detector.config.clone())?;
            detector.collector = Some(Arc::new(collector));
        }
        Ok(detector)
    }

    #[cfg(feature = "scanner")]
    pub fn with_collector(mut self, collector: EvidenceCollector) -> Self {
        self.collector = Some(Arc::new(collector));
        self
    }

    pub fn database(&self) -> &SignatureDb {
        &self.db
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// 纯匹配：证据包 → 最终结果
    pub fn analyze_bundle(&self, evidence: &EvidenceBundle) -> EnrichedResult {
        let start = Instant::now();
        let detections = SignalEvaluator::evaluate_db(&self.db, evidence, self.config.is_fast());
        let result = ResultEnricher::enrich(&detections, &self.db);
        debug!(
            "Analyzed {} | detected: {} | enriched: {} | {:?}",
            evidence.url,
            detections.len(),
            result.len(),
            start.elapsed()
        );
        result
    }

    /// 离线检测：调用方已拿到最终 URL、响应头与响应体
    pub fn detect(&self, url: &str, headers: &HeaderMap, body: &str) -> EnrichedResult {
        let evidence = EvidenceBuilder::from_page(&self.db, url, headers, body);
        self.analyze_bundle(&evidence)
    }

    /// 在线扫描单个 URL；URL 无法解析时不发起请求
    #[cfg(feature = "scanner")]
    pub async fn scan(&self, url: &str) -> RswResult<EnrichedResult> {
        Url::parse(url)?;
        let collector = self.collector.as_ref().ok_or_else(|| {
            RswappError::InvalidInput("检测器未配置网络采集器".to_string())
        })?;
        let evidence = collector.collect(&self.db, url).await?;
        Ok(self.analyze_bundle(&evidence))
    }

    /// 并发扫描多个 URL，并发数受 `threads` 限制
    /// 单个 URL 失败时结果为空并记录告警
    #[cfg(feature = "scanner")]
    pub async fn scan_many<I, S>(&self, urls: I) -> ScanResults
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        use futures::future::join_all;
        use tokio::sync::Semaphore;

        let semaphore = Semaphore::new(self.config.threads.max(1));
        let tasks = urls.into_iter().map(Into::into).map(|url: String| {
            let semaphore = &semaphore;
            async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => self.scan(&url).await,
                    Err(e) => Err(RswappError::AsyncTaskError(e.to_string())),
                };
                let result = result.unwrap_or_else(|e| {
                    log::warn!("Scan failed: {} | {}", url, e);
                    EnrichedResult::new()
                });
                (url, result)
            }
        });

        join_all(tasks).await.into_iter().collect()
    }
}
