//! 外链脚本拉取 + 全局变量提取
use futures::future::join_all;
use log::{debug, warn};
use rswappnext_engine::JsGlobals;
use tokio::sync::Semaphore;

use super::fetcher::PageFetcher;
use crate::evidence::EvidenceBuilder;
use crate::extractor::extract_script_urls;

/// 外链脚本的采集结果
#[derive(Debug, Clone, Default)]
pub struct ScriptHarvest {
    /// 每个有效脚本一份，顺序与输入地址一致
    pub globals: Vec<JsGlobals>,
    /// 脚本正文中出现的 URL，追加到 scriptSrc
    pub urls: Vec<String>,
}

pub struct ScriptCollector<'a> {
    fetcher: &'a dyn PageFetcher,
    workers: usize,
}

impl<'a> ScriptCollector<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
        }
    }

    /// 只拉取 `.js` 结尾或带 `.js?` 的地址
    pub fn is_script_url(src: &str) -> bool {
        src.ends_with(".js") || src.contains(".js?")
    }

    /// 并发上限为 workers；单个脚本失败只记录日志
    pub async fn collect(&self, scheme: &str, sources: &[String]) -> ScriptHarvest {
        let semaphore = Semaphore::new(self.workers);

        let tasks = sources
            .iter()
            .filter(|src| Self::is_script_url(src))
            .map(|src| {
                let semaphore = &semaphore;
                async move {
                    let Ok(_permit) = semaphore.acquire().await else {
                        return None;
                    };
                    self.fetch_one(scheme, src).await
                }
            });

        let mut harvest = ScriptHarvest::default();
        for (globals, urls) in join_all(tasks).await.into_iter().flatten() {
            harvest.globals.push(globals);
            harvest.urls.extend(urls);
        }
        debug!(
            "Scripts collected | candidates: {} | with globals: {} | urls: {}",
            sources.len(),
            harvest.globals.len(),
            harvest.urls.len()
        );
        harvest
    }

    async fn fetch_one(&self, scheme: &str, src: &str) -> Option<(JsGlobals, Vec<String>)> {
        let page = match self.fetcher.fetch(src).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Script fetch skipped: {}", e);
                return None;
            }
        };
        if !page.is_javascript() {
            debug!("Not javascript, skipped: {} ({})", src, page.content_type());
            return None;
        }

        let globals = EvidenceBuilder::script_globals(&page.body)?;
        Some((globals, extract_script_urls(scheme, &page.body)))
    }
}
