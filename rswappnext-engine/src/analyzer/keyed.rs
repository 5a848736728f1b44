//! 键控证据类别：meta / cookies / headers / dns
use super::{hit_only, Analyzer};
use crate::core::{EvidenceBundle, EvidenceCategory, MatchOutcome, TechSignature};
use crate::pattern::DictMatcher;

pub struct MetaAnalyzer;

impl Analyzer for MetaAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Meta;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let Some(rules) = &signature.meta else {
            return Vec::new();
        };
        hit_only(DictMatcher::match_dict(rules, &evidence.meta))
    }
}

pub struct CookieAnalyzer;

impl Analyzer for CookieAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Cookies;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let Some(rules) = &signature.cookies else {
            return Vec::new();
        };
        hit_only(DictMatcher::match_dict(rules, &evidence.cookies))
    }
}

pub struct HeaderAnalyzer;

impl Analyzer for HeaderAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Headers;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let Some(rules) = &signature.headers else {
            return Vec::new();
        };
        hit_only(DictMatcher::match_dict(rules, &evidence.headers))
    }
}

pub struct DnsAnalyzer;

impl Analyzer for DnsAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Dns;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        match (&signature.dns, &evidence.dns) {
            (Some(rules), Some(records)) => hit_only(DictMatcher::match_dict(rules, records)),
            _ => Vec::new(),
        }
    }
}
