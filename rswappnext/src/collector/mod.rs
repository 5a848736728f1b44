//! 网络证据采集：页面、外链脚本、DNS、robots.txt
pub mod dns;
pub mod fetcher;
pub mod robots;
pub mod scripts;

use std::sync::Arc;

use log::{debug, warn};
use rswappnext_engine::{EvidenceBundle, EvidenceMap, SignatureDb};
use url::Url;

use crate::config::ScanConfig;
use crate::error::RswResult;
use crate::evidence::EvidenceBuilder;

pub use dns::{registrable_domain, DnsLookup};
pub use fetcher::{FetchedPage, PageFetcher, ReqwestFetcher};
pub use robots::RobotsFetcher;
pub use scripts::{ScriptCollector, ScriptHarvest};

/// 单个 URL 的完整证据采集
pub struct EvidenceCollector {
    fetcher: Arc<dyn PageFetcher>,
    dns: Option<DnsLookup>,
    config: ScanConfig,
}

impl EvidenceCollector {
    /// DNS 解析器创建失败时只告警，DNS 证据缺省
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: ScanConfig) -> Self {
        let dns = match DnsLookup::new() {
            Ok(resolver) => Some(resolver),
            Err(e) => {
                warn!("DNS evidence disabled: {}", e);
                None
            }
        };
        Self { fetcher, dns, config }
    }

    pub fn from_config(config: ScanConfig) -> RswResult<Self> {
        let fetcher = ReqwestFetcher::new(&config)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// 不做 DNS 查询
    pub fn without_dns(mut self) -> Self {
        self.dns = None;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// 首页拉取失败返回错误；其余采集失败只导致对应证据缺省
    /// fast 模式跳过外链脚本、DNS、robots.txt
    pub async fn collect(&self, db: &SignatureDb, url: &str) -> RswResult<EvidenceBundle> {
        let page = self.fetcher.fetch(url).await?;
        let mut bundle = EvidenceBuilder::from_page(db, &page.final_url, &page.headers, &page.body);

        if self.config.is_fast() {
            return Ok(bundle);
        }

        let final_url = Url::parse(&page.final_url).ok();
        let scheme = final_url.as_ref().map(Url::scheme).unwrap_or("https");
        let host = final_url.as_ref().and_then(Url::host_str).unwrap_or_default();

        let sources = bundle.script_src.clone();
        let scripts = ScriptCollector::new(self.fetcher.as_ref(), self.config.script_workers);
        let (harvest, dns, robots) = tokio::join!(
            scripts.collect(scheme, &sources),
            self.lookup_dns(host),
            RobotsFetcher::fetch(self.fetcher.as_ref(), &page.final_url),
        );

        bundle.js.extend(harvest.globals);
        bundle.script_src.extend(harvest.urls);
        bundle.dns = dns;
        bundle.robots = robots;

        debug!(
            "Evidence collected | url: {} | scripts: {} | js: {} | dns: {} | robots: {}",
            bundle.url,
            bundle.script_src.len(),
            bundle.js.len(),
            bundle.dns.is_some(),
            bundle.robots.is_some()
        );
        Ok(bundle)
    }

    async fn lookup_dns(&self, host: &str) -> Option<EvidenceMap> {
        let dns = self.dns.as_ref()?;
        if host.is_empty() {
            return None;
        }
        Some(dns.lookup(&registrable_domain(host)).await)
    }
}
