// 核心数据模型：签名、证据、检测结果
pub mod core;
// 模式编译 + 规则/字典匹配
pub mod pattern;
// 内联脚本全局变量提取
pub mod js;
// 按类别评估证据并累积置信度
pub mod analyzer;
// 分类/分组补全 + 关联推导
pub mod enricher;
// 规则源解析 (Wappalyzer JSON)
pub mod source;
pub mod utils;
pub mod error;

// 顶层导出常用类型
pub use analyzer::{DetectionUpdater, SignalEvaluator};
pub use core::{
    CategoryEntry, DetectionEntry, DetectionMap, DomQuery, DomRule, EnrichedEntry, EnrichedResult,
    EvidenceBundle, EvidenceCategory, EvidenceMap, GroupEntry, JsBinding, JsGlobals, JsValue,
    KeyedRule, MatchOutcome, PatternRule, RulePattern, SignatureDb, TechSignature,
};
pub use enricher::ResultEnricher;
pub use error::{CoreError, CoreResult};
pub use js::JsGlobalExtractor;
pub use pattern::{CompiledRule, DictMatcher, PatternCompiler, RuleMatcher, VersionTemplate};
pub use source::WappalyzerParser;
