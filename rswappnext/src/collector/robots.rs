use log::debug;
use url::Url;

use super::fetcher::PageFetcher;

/// robots.txt 采集
pub struct RobotsFetcher;

impl RobotsFetcher {
    /// `scheme://host/robots.txt`
    pub fn robots_url(page_url: &str) -> Option<String> {
        let url = Url::parse(page_url).ok()?;
        let host = url.host_str()?;
        Some(format!("{}://{}/robots.txt", url.scheme(), host))
    }

    /// 拉取失败或非 2xx 返回 None
    pub async fn fetch(fetcher: &dyn PageFetcher, page_url: &str) -> Option<String> {
        let robots_url = Self::robots_url(page_url)?;
        match fetcher.fetch(&robots_url).await {
            Ok(page) if page.is_success() => Some(page.body),
            Ok(page) => {
                debug!("robots.txt unavailable: {} (status {})", robots_url, page.status);
                None
            }
            Err(e) => {
                debug!("robots.txt fetch failed: {}", e);
                None
            }
        }
    }
}
