use super::Analyzer;
use crate::core::{EvidenceBundle, EvidenceCategory, MatchOutcome, TechSignature};

/// DOM 选择器匹配：按声明顺序，第一个命中元素的选择器生效，不产出版本
pub struct DomAnalyzer;

impl Analyzer for DomAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Dom;

    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let (Some(rule), Some(dom)) = (&signature.dom, &evidence.dom) else {
            return Vec::new();
        };

        rule.selectors()
            .into_iter()
            .filter_map(|pattern| pattern.compiled())
            .find(|compiled| dom.select_exists(&compiled.pattern))
            .map(|compiled| vec![MatchOutcome::hit("", compiled.confidence)])
            .unwrap_or_default()
    }
}
