use super::category::EvidenceCategory;
use super::rule_def::{DomRule, KeyedRule, PatternRule};

/// 单个技术的签名：分类、关联关系、各证据类别的规则
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechSignature {
    pub name: String,
    pub categories: Vec<u32>,
    pub requires: Vec<String>,
    pub implies: Vec<String>,
    pub excludes: Vec<String>,

    pub cert_issuer: Option<PatternRule>,
    pub script_src: Option<PatternRule>,
    pub dom: Option<DomRule>,
    pub meta: Option<KeyedRule>,
    pub xhr: Option<PatternRule>,
    pub html: Option<PatternRule>,
    pub js: Option<KeyedRule>,
    pub cookies: Option<KeyedRule>,
    pub headers: Option<KeyedRule>,
    pub url: Option<PatternRule>,
    pub dns: Option<KeyedRule>,
    pub robots: Option<PatternRule>,

    // 非匹配字段 - 特性开关控制
    #[cfg(feature = "full-meta")]
    pub website: Option<String>,
    #[cfg(feature = "full-meta")]
    pub description: Option<String>,
    #[cfg(feature = "full-meta")]
    pub icon: Option<String>,
    #[cfg(feature = "full-meta")]
    pub cpe: Option<String>,
    #[cfg(feature = "full-meta")]
    pub saas: Option<bool>,
    #[cfg(feature = "full-meta")]
    pub pricing: Option<Vec<String>>,
}

impl TechSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 该技术是否声明了指定类别的规则
    pub fn has_rule(&self, category: EvidenceCategory) -> bool {
        match category {
            EvidenceCategory::CertIssuer => self.cert_issuer.is_some(),
            EvidenceCategory::ScriptSrc => self.script_src.is_some(),
            EvidenceCategory::Dom => self.dom.is_some(),
            EvidenceCategory::Meta => self.meta.is_some(),
            EvidenceCategory::Xhr => self.xhr.is_some(),
            EvidenceCategory::Html => self.html.is_some(),
            EvidenceCategory::Js => self.js.is_some(),
            EvidenceCategory::Cookies => self.cookies.is_some(),
            EvidenceCategory::Headers => self.headers.is_some(),
            EvidenceCategory::Url => self.url.is_some(),
            EvidenceCategory::Dns => self.dns.is_some(),
            EvidenceCategory::Robots => self.robots.is_some(),
        }
    }

    /// requires ∪ implies，按声明顺序
    pub fn related(&self) -> impl Iterator<Item = &str> {
        self.requires
            .iter()
            .chain(self.implies.iter())
            .map(String::as_str)
    }
}
