use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 匹配器输出：(是否命中, 版本, 置信度)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matched: bool,
    pub version: String,
    pub confidence: u8,
}

impl MatchOutcome {
    #[inline]
    pub fn miss() -> Self {
        Self::default()
    }

    #[inline]
    pub fn hit(version: impl Into<String>, confidence: u8) -> Self {
        Self {
            matched: true,
            version: version.into(),
            confidence,
        }
    }
}

/// 单个技术的累积检测状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEntry {
    pub version: String,
    pub confidence: u8,
}

impl DetectionEntry {
    /// 置信度已满且已有版本：后续类别不再评估
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.confidence >= 100 && !self.version.is_empty()
    }
}

/// 技术名 → 检测状态（有序，输出稳定）
pub type DetectionMap = BTreeMap<String, DetectionEntry>;
