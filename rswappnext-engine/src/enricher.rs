//! 结果补全：分类 / 分组解析 + requires / implies 关联推导
use std::collections::VecDeque;

use log::debug;
use rustc_hash::FxHashSet;

use crate::core::{DetectionMap, EnrichedEntry, EnrichedResult, SignatureDb};

pub struct ResultEnricher;

impl ResultEnricher {
    /// 检测结果 → 最终结果
    /// - 直接检测到的技术：保留版本与置信度，补全分类与分组
    /// - 关联推导出的技术：置信度 100，版本为空；被任一已接纳技术 excludes 的不加入
    /// - excludes 不会移除直接检测到的技术
    pub fn enrich(detections: &DetectionMap, db: &SignatureDb) -> EnrichedResult {
        let mut result = EnrichedResult::new();

        for (name, detection) in detections {
            let (categories, groups) = db.resolve_labels(name);
            result.insert(
                name.clone(),
                EnrichedEntry {
                    version: detection.version.clone(),
                    confidence: detection.confidence,
                    categories,
                    groups,
                },
            );
        }

        for name in Self::relation_closure(detections, db) {
            debug!("[enrich] implied tech added: {}", name);
            let (categories, groups) = db.resolve_labels(&name);
            result.insert(
                name,
                EnrichedEntry {
                    version: String::new(),
                    confidence: 100,
                    categories,
                    groups,
                },
            );
        }

        result
    }

    /// 广度优先展开 requires ∪ implies，返回新推导出的技术
    /// 只有被接纳的技术（直接检测到，或被推导且未被排除）才贡献自己的关联与 excludes：
    /// 1. 先收集直接检测到的技术的 excludes
    /// 2. 展开时跳过已被排除的名称，被跳过的技术不再继续展开
    /// 3. 展开结束后，再去掉被后接纳技术排除的推导项
    fn relation_closure(detections: &DetectionMap, db: &SignatureDb) -> Vec<String> {
        let mut visited: FxHashSet<&str> = detections.keys().map(String::as_str).collect();
        let mut queue: VecDeque<&str> = detections.keys().map(String::as_str).collect();
        let mut excluded: FxHashSet<&str> = detections
            .keys()
            .filter_map(|name| db.get(name))
            .flat_map(|signature| signature.excludes.iter().map(String::as_str))
            .collect();
        let mut implied: Vec<&str> = Vec::new();

        while let Some(name) = queue.pop_front() {
            let Some(signature) = db.get(name) else {
                continue;
            };

            for related in signature.related() {
                if excluded.contains(related) || !visited.insert(related) {
                    continue;
                }
                implied.push(related);
                queue.push_back(related);
                if let Some(admitted) = db.get(related) {
                    excluded.extend(admitted.excludes.iter().map(String::as_str));
                }
            }
        }

        implied
            .into_iter()
            .filter(|name| !excluded.contains(name))
            .map(str::to_string)
            .collect()
    }
}
