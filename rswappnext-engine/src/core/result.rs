use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 最终输出的技术条目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedEntry {
    pub version: String,
    pub confidence: u8,
    pub categories: Vec<String>,
    pub groups: Vec<String>,
}

impl fmt::Display for EnrichedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "confidence={}", self.confidence)
        } else {
            write!(f, "v{} confidence={}", self.version, self.confidence)
        }
    }
}

/// 技术名 → 最终条目
pub type EnrichedResult = BTreeMap<String, EnrichedEntry>;
