//! HTML 标签提取器
//! 负责从 HTML 中提取 <script src>、内联脚本和 <meta> 标签
use std::cell::RefCell;

use lol_html::{element, text, HtmlRewriter, Settings};
use url::Url;

use super::script_urls::{extract_script_urls, with_scheme};

/// 提取结果结构体
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageArtifacts {
    /// 外链脚本地址（已按页面地址解析为绝对地址）+ 内联脚本中出现的 URL
    pub script_srcs: Vec<String>,
    /// 无 src 的内联脚本正文
    pub inline_scripts: Vec<String>,
    /// (name | property, content)，重复键全部保留
    pub meta_tags: Vec<(String, String)>,
}

#[derive(Default)]
struct ExtractState {
    artifacts: PageArtifacts,
    in_inline_script: bool,
}

impl ExtractState {
    fn push_script_src(&mut self, base: Option<&Url>, scheme: &str, src: &str) {
        let src = src.trim();
        if src.is_empty() || src.len() > 2048 || src.contains(['<', '>', '\n', '\r']) {
            return;
        }
        let resolved = match base.and_then(|b| b.join(src).ok()) {
            Some(url) => url.to_string(),
            None => with_scheme(scheme, src),
        };
        self.artifacts.script_srcs.push(resolved);
    }
}

/// 对外暴露的HTML提取器
#[derive(Debug, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base_url` 用于解析相对脚本地址；解析失败时原样保留
    pub fn extract(html: &str, base_url: &str) -> PageArtifacts {
        let base = Url::parse(base_url).ok();
        let scheme = base.as_ref().map(|u| u.scheme().to_string()).unwrap_or_default();

        let state = RefCell::new(ExtractState::default());

        let settings = Settings {
            strict: false, // 兼容畸形HTML/大小写标签/残缺标签
            element_content_handlers: vec![
                element!("script", |el| {
                    let mut state = state.borrow_mut();
                    match el.get_attribute("src") {
                        Some(src) => {
                            state.in_inline_script = false;
                            state.push_script_src(base.as_ref(), &scheme, &src);
                        }
                        None => {
                            state.in_inline_script = true;
                            state.artifacts.inline_scripts.push(String::new());
                        }
                    }
                    Ok(())
                }),
                text!("script", |chunk| {
                    let mut state = state.borrow_mut();
                    if state.in_inline_script {
                        if let Some(body) = state.artifacts.inline_scripts.last_mut() {
                            body.push_str(chunk.as_str());
                        }
                    }
                    Ok(())
                }),
                // <meta name|property="" content="">
                element!("meta", |el| {
                    let key = el.get_attribute("name").or_else(|| el.get_attribute("property"));
                    if let (Some(key), Some(content)) = (key, el.get_attribute("content")) {
                        if !key.is_empty() && !content.is_empty() && content.len() <= 4096 {
                            state.borrow_mut().artifacts.meta_tags.push((key, content));
                        }
                    }
                    Ok(())
                }),
            ],
            ..Settings::default()
        };

        // 只提取不修改，输出丢弃
        let mut rewriter = HtmlRewriter::new(settings, |_: &[u8]| {});
        let _ = rewriter.write(html.as_bytes());
        let _ = rewriter.end();

        let mut artifacts = state.into_inner().artifacts;
        artifacts.inline_scripts.retain(|body| !body.trim().is_empty());
        for body in &artifacts.inline_scripts {
            artifacts.script_srcs.extend(extract_script_urls(&scheme, body));
        }
        artifacts
    }
}
