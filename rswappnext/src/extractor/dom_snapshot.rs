//! DOM 选择器快照
//! 一次 lol_html 扫描评估全部选择器，记录哪些选择器命中过元素
use std::cell::RefCell;

use log::debug;
use lol_html::{element, HtmlRewriter, Selector, Settings};
use rustc_hash::FxHashSet;
use rswappnext_engine::{DomQuery, SignatureDb};

/// 选择器命中集合，实现 DomQuery 供 DOM 分析器查询
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomSnapshot {
    present: FxHashSet<String>,
}

impl DomSnapshot {
    /// lol_html 不支持的选择器视为不存在
    pub fn capture<'a, I>(html: &str, selectors: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut unique: Vec<&str> = Vec::new();
        let mut seen = FxHashSet::default();
        for selector in selectors {
            let selector = selector.trim();
            if selector.is_empty() || !seen.insert(selector) {
                continue;
            }
            if selector.parse::<Selector>().is_err() {
                debug!("Unsupported DOM selector skipped: {}", selector);
                continue;
            }
            unique.push(selector);
        }

        let present = RefCell::new(FxHashSet::default());
        if unique.is_empty() {
            return Self::default();
        }

        let handlers = unique
            .iter()
            .map(|selector| {
                let present = &present;
                element!(*selector, move |_el| {
                    present.borrow_mut().insert(selector.to_string());
                    Ok(())
                })
            })
            .collect();

        let settings = Settings {
            strict: false,
            element_content_handlers: handlers,
            ..Settings::default()
        };

        let mut rewriter = HtmlRewriter::new(settings, |_: &[u8]| {});
        let _ = rewriter.write(html.as_bytes());
        let _ = rewriter.end();

        Self {
            present: present.into_inner(),
        }
    }

    /// 收集签名库中所有 DOM 规则的选择器后扫描
    pub fn capture_for(html: &str, db: &SignatureDb) -> Self {
        let selectors = db
            .signatures()
            .iter()
            .filter_map(|sig| sig.dom.as_ref())
            .flat_map(|dom| dom.selectors())
            .filter_map(|pattern| pattern.compiled())
            .map(|compiled| compiled.pattern.as_str());
        Self::capture(html, selectors)
    }

    pub fn len(&self) -> usize {
        self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}

impl DomQuery for DomSnapshot {
    fn select_exists(&self, selector: &str) -> bool {
        self.present.contains(selector.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rswappnext_engine::{DomRule, RulePattern, TechSignature};

    const PAGE: &str = r#"<html><body><div id="app" data-v-app></div><a class="wp-block-button" href="/">x</a></body></html>"#;

    #[test]
    fn test_capture_present_and_absent() {
        let snapshot = DomSnapshot::capture(PAGE, ["div[data-v-app]", "#root", "a.wp-block-button", "#app"]);
        assert!(snapshot.select_exists("div[data-v-app]"));
        assert!(snapshot.select_exists("a.wp-block-button"));
        assert!(snapshot.select_exists("#app"));
        assert!(!snapshot.select_exists("#root"));
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_invalid_selectors_count_as_absent() {
        let snapshot = DomSnapshot::capture(PAGE, ["div:contains('x')", "[[", "#app"]);
        assert!(!snapshot.select_exists("div:contains('x')"));
        assert!(snapshot.select_exists("#app"));
    }

    #[test]
    fn test_capture_for_database() {
        let mut vue = TechSignature::new("Vue.js");
        vue.dom = Some(DomRule::Selector(RulePattern::new(r"div[data-v-app]\;confidence:50")));
        let db = SignatureDb::new(vec![vue], Default::default(), Default::default());

        let snapshot = DomSnapshot::capture_for(PAGE, &db);
        assert!(snapshot.select_exists("div[data-v-app]"));
    }
}
