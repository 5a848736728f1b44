//! 信号评估
//! 每个证据类别一个分析器，评估器按固定顺序依次调用并累积结果
use crate::core::{EvidenceBundle, EvidenceCategory, MatchOutcome, TechSignature};

mod dom;
mod evaluator;
mod js;
mod keyed;
mod scalar;
mod updater;

pub use dom::DomAnalyzer;
pub use evaluator::SignalEvaluator;
pub use js::{match_script, JsAnalyzer};
pub use keyed::{CookieAnalyzer, DnsAnalyzer, HeaderAnalyzer, MetaAnalyzer};
pub use scalar::{
    CertIssuerAnalyzer, HtmlAnalyzer, RobotsAnalyzer, ScriptSrcAnalyzer, UrlAnalyzer, XhrAnalyzer,
};
pub use updater::DetectionUpdater;

/// 单类别分析器
pub trait Analyzer {
    /// 对应的证据类别，用于日志标准化输出
    const CATEGORY: EvidenceCategory;

    /// 返回该技术在此类别上的全部命中（按应用顺序）
    /// 没有规则或没有证据时返回空
    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome>;
}

/// 类别 → 分析器
pub fn analyze_category(
    category: EvidenceCategory,
    signature: &TechSignature,
    evidence: &EvidenceBundle,
) -> Vec<MatchOutcome> {
    match category {
        EvidenceCategory::CertIssuer => CertIssuerAnalyzer::analyze(signature, evidence),
        EvidenceCategory::ScriptSrc => ScriptSrcAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Dom => DomAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Meta => MetaAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Xhr => XhrAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Html => HtmlAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Js => JsAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Cookies => CookieAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Headers => HeaderAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Url => UrlAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Dns => DnsAnalyzer::analyze(signature, evidence),
        EvidenceCategory::Robots => RobotsAnalyzer::analyze(signature, evidence),
    }
}

#[inline]
fn hit_only(outcome: MatchOutcome) -> Vec<MatchOutcome> {
    if outcome.matched {
        vec![outcome]
    } else {
        Vec::new()
    }
}
