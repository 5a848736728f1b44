//! 证据组装：单个页面响应 → EvidenceBundle（离线，无网络）
use std::sync::Arc;

use http::header::HeaderMap;
use log::debug;
use rswappnext_engine::{EvidenceBundle, JsGlobalExtractor, JsGlobals, SignatureDb};

use crate::extractor::{DomSnapshot, HeaderConverter, HtmlExtractor};

pub struct EvidenceBuilder;

impl EvidenceBuilder {
    /// 由最终 URL、响应头、响应体组装证据
    /// DNS / robots / 外链脚本不在此采集，保持 None / 空
    pub fn from_page(db: &SignatureDb, url: &str, headers: &HeaderMap, body: &str) -> EvidenceBundle {
        let mut bundle = EvidenceBundle::new(url, body);

        let (header_map, cookies) = HeaderConverter::convert_all(headers);
        bundle.headers = header_map;
        bundle.cookies = cookies;

        let artifacts = HtmlExtractor::extract(body, url);
        for (key, content) in artifacts.meta_tags {
            bundle.meta.insert(&key, content);
        }
        bundle.script_src = artifacts.script_srcs;
        bundle.js = artifacts
            .inline_scripts
            .iter()
            .filter_map(|script| Self::script_globals(script))
            .collect();

        bundle.dom = Some(Arc::new(DomSnapshot::capture_for(body, db)));

        debug!(
            "Evidence built | url: {} | headers: {} | cookies: {} | meta: {} | scripts: {} | js: {}",
            url,
            bundle.headers.len(),
            bundle.cookies.len(),
            bundle.meta.len(),
            bundle.script_src.len(),
            bundle.js.len()
        );
        bundle
    }

    /// 主映射为空的脚本不计入 js 证据
    pub fn script_globals(source: &str) -> Option<JsGlobals> {
        let globals = JsGlobalExtractor::extract(source);
        (!globals.primary.is_empty()).then_some(globals)
    }
}
