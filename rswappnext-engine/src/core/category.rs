use serde::{Deserialize, Serialize};
use std::fmt;

/// 证据类别
/// 声明顺序即评估优先级，`ORDER` 与之保持一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvidenceCategory {
    CertIssuer,
    ScriptSrc,
    Dom,
    Meta,
    Xhr,
    Html,
    Js,
    Cookies,
    Headers,
    Url,
    Dns,
    Robots,
}

impl EvidenceCategory {
    /// 固定评估顺序（决定同一技术的版本来源）
    pub const ORDER: [EvidenceCategory; 12] = [
        EvidenceCategory::CertIssuer,
        EvidenceCategory::ScriptSrc,
        EvidenceCategory::Dom,
        EvidenceCategory::Meta,
        EvidenceCategory::Xhr,
        EvidenceCategory::Html,
        EvidenceCategory::Js,
        EvidenceCategory::Cookies,
        EvidenceCategory::Headers,
        EvidenceCategory::Url,
        EvidenceCategory::Dns,
        EvidenceCategory::Robots,
    ];

    /// 技术库 JSON 中的字段名
    pub const fn as_str(&self) -> &'static str {
        match self {
            EvidenceCategory::CertIssuer => "certIssuer",
            EvidenceCategory::ScriptSrc => "scriptSrc",
            EvidenceCategory::Dom => "dom",
            EvidenceCategory::Meta => "meta",
            EvidenceCategory::Xhr => "xhr",
            EvidenceCategory::Html => "html",
            EvidenceCategory::Js => "js",
            EvidenceCategory::Cookies => "cookies",
            EvidenceCategory::Headers => "headers",
            EvidenceCategory::Url => "url",
            EvidenceCategory::Dns => "dns",
            EvidenceCategory::Robots => "robots",
        }
    }

    /// 快速扫描模式下跳过的类别（需要额外网络请求）
    pub const fn requires_full_scan(&self) -> bool {
        matches!(self, EvidenceCategory::Dns | EvidenceCategory::Robots)
    }
}

impl fmt::Display for EvidenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
