//! 标量证据类别：certIssuer / scriptSrc / xhr / html / url / robots
use super::{hit_only, Analyzer};
use crate::core::{EvidenceBundle, EvidenceCategory, MatchOutcome, PatternRule, TechSignature};
use crate::pattern::RuleMatcher;

/// 每个脚本地址单独匹配，逐条累积
fn per_source(rule: &PatternRule, sources: &[String]) -> Vec<MatchOutcome> {
    sources
        .iter()
        .map(|src| RuleMatcher::match_rule(rule, std::slice::from_ref(src)))
        .filter(|outcome| outcome.matched)
        .collect()
}

pub struct CertIssuerAnalyzer;

impl Analyzer for CertIssuerAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::CertIssuer;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let Some(rule) = &signature.cert_issuer else {
            return Vec::new();
        };
        if evidence.cert_issuer.is_empty() {
            return Vec::new();
        }
        hit_only(RuleMatcher::match_rule(rule, &[evidence.cert_issuer.as_str()]))
    }
}

pub struct ScriptSrcAnalyzer;

impl Analyzer for ScriptSrcAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::ScriptSrc;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        signature
            .script_src
            .as_ref()
            .map(|rule| per_source(rule, &evidence.script_src))
            .unwrap_or_default()
    }
}

/// 纯 HTTP 模式下拿不到 XHR 请求，以脚本地址代替
pub struct XhrAnalyzer;

impl Analyzer for XhrAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Xhr;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        signature
            .xhr
            .as_ref()
            .map(|rule| per_source(rule, &evidence.script_src))
            .unwrap_or_default()
    }
}

pub struct HtmlAnalyzer;

impl Analyzer for HtmlAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Html;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let Some(rule) = &signature.html else {
            return Vec::new();
        };
        hit_only(RuleMatcher::match_rule(rule, &[evidence.html.as_str()]))
    }
}

pub struct UrlAnalyzer;

impl Analyzer for UrlAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Url;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let Some(rule) = &signature.url else {
            return Vec::new();
        };
        hit_only(RuleMatcher::match_rule(rule, &[evidence.url.as_str()]))
    }
}

pub struct RobotsAnalyzer;

impl Analyzer for RobotsAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Robots;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        match (&signature.robots, &evidence.robots) {
            (Some(rule), Some(robots)) => hit_only(RuleMatcher::match_rule(rule, &[robots.as_str()])),
            _ => Vec::new(),
        }
    }
}
