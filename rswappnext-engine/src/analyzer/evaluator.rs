use log::{debug, trace};

use super::{analyze_category, DetectionUpdater};
use crate::core::{DetectionMap, EvidenceBundle, EvidenceCategory, SignatureDb, TechSignature};

/// 信号评估器
/// 对每个技术按 `EvidenceCategory::ORDER` 依次评估各类别，命中即累积；
/// 某技术达到 100 置信度且已有版本后，跳过其剩余类别
pub struct SignalEvaluator;

impl SignalEvaluator {
    /// `fast` 为 true 时跳过 dns / robots
    pub fn evaluate<'a, I>(signatures: I, evidence: &EvidenceBundle, fast: bool) -> DetectionMap
    where
        I: IntoIterator<Item = &'a TechSignature>,
    {
        let mut detections = DetectionMap::new();
        for signature in signatures {
            Self::evaluate_signature(signature, evidence, fast, &mut detections);
        }
        detections.retain(|_, entry| entry.confidence > 0);
        detections
    }

    pub fn evaluate_db(db: &SignatureDb, evidence: &EvidenceBundle, fast: bool) -> DetectionMap {
        Self::evaluate(db.signatures(), evidence, fast)
    }

    fn evaluate_signature(
        signature: &TechSignature,
        evidence: &EvidenceBundle,
        fast: bool,
        detections: &mut DetectionMap,
    ) {
        let categories = EvidenceCategory::ORDER
            .into_iter()
            .filter(|category| !(fast && category.requires_full_scan()))
            .filter(|category| signature.has_rule(*category));

        for category in categories {
            for outcome in analyze_category(category, signature, evidence) {
                debug!(
                    "[{}] matched | tech: {} | version: {:?} | confidence: {}",
                    category, signature.name, outcome.version, outcome.confidence
                );
                if DetectionUpdater::update(detections, &signature.name, outcome) {
                    trace!("[{}] saturated, skipping remaining categories", signature.name);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        DetectionEntry, DomQuery, DomRule, EvidenceMap, JsBinding, JsGlobals, JsValue, KeyedRule,
        PatternRule, RulePattern,
    };
    use std::sync::Arc;

    struct FixedDom(Vec<&'static str>);

    impl DomQuery for FixedDom {
        fn select_exists(&self, selector: &str) -> bool {
            self.0.contains(&selector)
        }
    }

    fn entry(version: &str, confidence: u8) -> DetectionEntry {
        DetectionEntry {
            version: version.to_string(),
            confidence,
        }
    }

    fn nginx() -> TechSignature {
        let mut sig = TechSignature::new("Nginx");
        sig.headers = Some(
            KeyedRule::new().with("server", PatternRule::single(r"nginx(?:/([\d.]+))?\;version:\1")),
        );
        sig
    }

    #[test]
    fn test_header_detection_with_version() {
        let mut evidence = EvidenceBundle::new("https://example.com/", "<html></html>");
        evidence.headers.insert("Server", "nginx/1.25.3");

        let detections = SignalEvaluator::evaluate(&[nginx()], &evidence, false);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections["Nginx"], entry("1.25.3", 100));
    }

    #[test]
    fn test_no_evidence_yields_empty_map() {
        let evidence = EvidenceBundle::new("https://example.com/", "");
        assert!(SignalEvaluator::evaluate(&[nginx()], &evidence, false).is_empty());
    }

    #[test]
    fn test_fast_mode_skips_dns_and_robots() {
        let mut sig = TechSignature::new("Cloudflare DNS");
        sig.dns = Some(KeyedRule::new().with("NS", PatternRule::single(r"\.ns\.cloudflare\.com")));
        sig.robots = Some(PatternRule::single(r"Disallow: /cdn-cgi/"));

        let mut evidence = EvidenceBundle::new("https://example.com/", "");
        evidence.dns = Some(EvidenceMap::case_insensitive().with("NS", "ada.ns.cloudflare.com"));
        evidence.robots = Some("User-agent: *\nDisallow: /cdn-cgi/".into());

        let sigs = [sig];
        assert!(SignalEvaluator::evaluate(&sigs, &evidence, true).is_empty());
        assert_eq!(
            SignalEvaluator::evaluate(&sigs, &evidence, false)["Cloudflare DNS"],
            entry("", 100)
        );
    }

    #[test]
    fn test_confidence_sums_across_categories_and_caps() {
        let mut sig = TechSignature::new("WordPress");
        sig.meta = Some(KeyedRule::new().with(
            "generator",
            PatternRule::single(r"WordPress\;confidence:40"),
        ));
        sig.html = Some(PatternRule::single(r"wp-content\;confidence:50"));
        sig.url = Some(PatternRule::single(r"/wp-admin\;confidence:30"));

        let mut evidence = EvidenceBundle::new(
            "https://blog.example.com/wp-admin/",
            "<link href='/wp-content/themes/x.css'>",
        );
        evidence.meta.insert("generator", "WordPress");

        let detections = SignalEvaluator::evaluate(&[sig], &evidence, false);
        assert_eq!(detections["WordPress"], entry("", 100));
    }

    #[test]
    fn test_version_from_earliest_category_sticks() {
        // scriptSrc 先于 html 评估
        let mut sig = TechSignature::new("jQuery");
        sig.script_src = Some(PatternRule::single(r"jquery-(\d+(?:\.\d+)+)\;version:\1\;confidence:50"));
        sig.html = Some(PatternRule::single(r"jQuery v(\d+(?:\.\d+)+)\;version:\1\;confidence:50"));

        let mut evidence = EvidenceBundle::new("https://example.com/", "/*! jQuery v1.12.4 */");
        evidence.script_src = vec!["https://cdn.example.com/jquery-3.7.1.min.js".into()];

        let detections = SignalEvaluator::evaluate(&[sig], &evidence, false);
        assert_eq!(detections["jQuery"], entry("3.7.1", 100));
    }

    #[test]
    fn test_saturation_stops_remaining_categories() {
        let mut sig = TechSignature::new("Next.js");
        sig.script_src = Some(PatternRule::single(r"/_next/static/([\w-]+)/\;version:\1"));
        sig.headers = Some(KeyedRule::new().with("x-powered-by", PatternRule::single(r"Next\.js ([\d.]+)\;version:\1")));

        let mut evidence = EvidenceBundle::new("https://example.com/", "");
        evidence.script_src = vec![
            "https://example.com/_next/static/build-a/app.js".into(),
            "https://example.com/_next/static/build-b/app.js".into(),
        ];
        evidence.headers.insert("X-Powered-By", "Next.js 14.1.0");

        let detections = SignalEvaluator::evaluate(&[sig], &evidence, false);
        assert_eq!(detections["Next.js"], entry("build-a", 100));
    }

    #[test]
    fn test_each_script_source_accumulates() {
        let mut sig = TechSignature::new("Google Tag Manager");
        sig.script_src = Some(PatternRule::single(r"googletagmanager\.com\;confidence:30"));

        let mut evidence = EvidenceBundle::new("https://example.com/", "");
        evidence.script_src = vec![
            "https://www.googletagmanager.com/gtm.js?id=GTM-1".into(),
            "https://www.googletagmanager.com/gtag/js?id=G-2".into(),
            "https://cdn.example.com/app.js".into(),
        ];

        let detections = SignalEvaluator::evaluate(&[sig], &evidence, false);
        assert_eq!(detections["Google Tag Manager"].confidence, 60);
    }

    #[test]
    fn test_xhr_rules_read_script_sources() {
        let mut sig = TechSignature::new("Algolia");
        sig.xhr = Some(PatternRule::single(r"\.algolia(?:net\.com|\.net)"));

        let mut evidence = EvidenceBundle::new("https://example.com/", "");
        evidence.script_src = vec!["https://abc-dsn.algolia.net/1/indexes".into()];

        assert!(SignalEvaluator::evaluate(&[sig], &evidence, false).contains_key("Algolia"));
    }

    #[test]
    fn test_cert_issuer_only_when_present() {
        let mut sig = TechSignature::new("Let's Encrypt");
        sig.cert_issuer = Some(PatternRule::single("Let's Encrypt"));

        let mut evidence = EvidenceBundle::new("https://example.com/", "");
        assert!(SignalEvaluator::evaluate(std::slice::from_ref(&sig), &evidence, false).is_empty());

        evidence.cert_issuer = "Let's Encrypt".into();
        assert!(SignalEvaluator::evaluate(&[sig], &evidence, false).contains_key("Let's Encrypt"));
    }

    #[test]
    fn test_dom_and_js_categories() {
        let mut vue = TechSignature::new("Vue.js");
        vue.dom = Some(DomRule::Selectors(vec![
            RulePattern::new(r"[data-server-rendered]\;confidence:50"),
            RulePattern::new("div[data-v-app]"),
        ]));
        vue.js = Some(KeyedRule::new().with("Vue", PatternRule::single(r"(\d+(?:\.\d+)+)\;version:\1\;confidence:50")));

        let mut evidence = EvidenceBundle::new("https://example.com/", "");
        evidence.dom = Some(Arc::new(FixedDom(vec!["div[data-v-app]"])));
        let mut script = JsGlobals::default();
        script.primary.insert(
            "Vue".into(),
            JsBinding {
                value: JsValue::Str("3.4.21".into()),
                level: 3,
            },
        );
        evidence.js = vec![script];

        let detections = SignalEvaluator::evaluate(&[vue], &evidence, false);
        assert_eq!(detections["Vue.js"], entry("3.4.21", 100));
    }

    #[test]
    fn test_zero_confidence_entries_are_dropped() {
        let mut sig = TechSignature::new("Tracker");
        sig.html = Some(PatternRule::single(r"tracker v(\d+)\;version:\1\;confidence:0"));

        let evidence = EvidenceBundle::new("https://example.com/", "tracker v2");
        assert!(SignalEvaluator::evaluate(&[sig], &evidence, false).is_empty());
    }
}
