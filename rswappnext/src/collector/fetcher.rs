//! HTTP 拉取抽象
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE};
use log::debug;
use reqwest::{redirect::Policy, Client};

use crate::config::ScanConfig;
use crate::error::{RswResult, RswappError};

/// 单次拉取结果
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// 跟随重定向后的最终地址
    pub final_url: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// application/javascript 或 text/javascript（忽略参数与大小写）
    pub fn is_javascript(&self) -> bool {
        let content_type = self.content_type().trim_start().to_ascii_lowercase();
        content_type.starts_with("application/javascript") || content_type.starts_with("text/javascript")
    }
}

/// 页面拉取接口；测试中可替换为离线实现
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> RswResult<FetchedPage>;
}

/// 基于 reqwest 的拉取实现
/// 模拟浏览器请求头，接受无效证书，配置了 Cookie 时随每个请求发送
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    cookie: Option<HeaderValue>,
}

impl ReqwestFetcher {
    pub fn new(config: &ScanConfig) -> RswResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        default_headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        default_headers.insert("DNT", HeaderValue::from_static("1"));
        default_headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers)
            .danger_accept_invalid_certs(true)
            .redirect(Policy::limited(10))
            .build()
            .map_err(|e| RswappError::NetworkError(format!("HTTP 客户端创建失败: {}", e)))?;

        let cookie = config
            .cookie
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()
            .map_err(|e| RswappError::InvalidInput(format!("Cookie 含非法字符: {}", e)))?;

        Ok(Self { client, cookie })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> RswResult<FetchedPage> {
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| RswappError::NetworkError(format!("请求[{}]失败: {}", url, e)))?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| RswappError::NetworkError(format!("读取[{}]响应体失败: {}", url, e)))?;

        debug!("Fetched {} -> {} | status: {} | {} bytes", url, final_url, status, body.len());
        Ok(FetchedPage {
            final_url,
            status,
            headers,
            body,
        })
    }
}
