use crate::core::{DetectionMap, MatchOutcome};

/// 检测结果累积工具
pub struct DetectionUpdater;

impl DetectionUpdater {
    /// 合并一次类别命中
    /// - 置信度累加，上限 100
    /// - 版本号只在当前为空时写入（先到先得）
    ///
    /// 返回该技术是否已饱和（100 且有版本）
    pub fn update(detections: &mut DetectionMap, tech_name: &str, outcome: MatchOutcome) -> bool {
        let entry = detections.entry(tech_name.to_string()).or_default();

        let summed = u16::from(entry.confidence) + u16::from(outcome.confidence);
        entry.confidence = summed.min(100) as u8;

        if entry.version.is_empty() && !outcome.version.is_empty() {
            entry.version = outcome.version;
        }

        entry.is_saturated()
    }
}
