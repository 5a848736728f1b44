mod category;
mod database;
mod detection;
mod evidence;
mod result;
mod rule_def;
mod signature;

// 导出常用项
pub use category::EvidenceCategory;
pub use database::{CategoryEntry, GroupEntry, SignatureDb};
pub use detection::{DetectionEntry, DetectionMap, MatchOutcome};
pub use evidence::{DomQuery, EvidenceBundle, EvidenceMap, JsBinding, JsGlobals, JsValue};
pub use result::{EnrichedEntry, EnrichedResult};
pub use rule_def::{DomRule, KeyedRule, PatternRule, RulePattern};
pub use signature::TechSignature;
