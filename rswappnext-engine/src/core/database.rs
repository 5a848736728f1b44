use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::signature::TechSignature;

/// 分类定义（categories.json）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryEntry {
    #[serde(default)] // 缺groups → 空数组 []
    pub groups: Vec<u32>,
    pub name: String,
    #[serde(default)]
    pub priority: u8,
}

/// 分组定义（groups.json）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupEntry {
    pub name: String,
}

/// 只读技术签名库
/// 加载后不再修改，可通过 Arc 在多个扫描任务间共享
#[derive(Debug, Clone, Default)]
pub struct SignatureDb {
    signatures: Vec<TechSignature>,
    index: FxHashMap<String, usize>,
    categories: FxHashMap<u32, CategoryEntry>,
    groups: FxHashMap<u32, GroupEntry>,
}

impl SignatureDb {
    /// 构建签名库；签名按名称排序，保证遍历顺序稳定
    pub fn new(
        mut signatures: Vec<TechSignature>,
        categories: FxHashMap<u32, CategoryEntry>,
        groups: FxHashMap<u32, GroupEntry>,
    ) -> Self {
        signatures.sort_by(|a, b| a.name.cmp(&b.name));
        signatures.dedup_by(|a, b| a.name == b.name);
        let index = signatures
            .iter()
            .enumerate()
            .map(|(i, sig)| (sig.name.clone(), i))
            .collect();

        Self {
            signatures,
            index,
            categories,
            groups,
        }
    }

    pub fn signatures(&self) -> &[TechSignature] {
        &self.signatures
    }

    pub fn get(&self, name: &str) -> Option<&TechSignature> {
        self.index.get(name).map(|&i| &self.signatures[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn category(&self, id: u32) -> Option<&CategoryEntry> {
        self.categories.get(&id)
    }

    pub fn group(&self, id: u32) -> Option<&GroupEntry> {
        self.groups.get(&id)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// 解析技术的分类名与分组名
    /// 未知技术返回空列表；未知分类 id 跳过；分组按首次出现顺序去重
    pub fn resolve_labels(&self, tech_name: &str) -> (Vec<String>, Vec<String>) {
        let Some(signature) = self.get(tech_name) else {
            return (Vec::new(), Vec::new());
        };

        let mut categories = Vec::with_capacity(signature.categories.len());
        let mut groups: Vec<String> = Vec::new();

        for entry in signature.categories.iter().filter_map(|id| self.category(*id)) {
            categories.push(entry.name.clone());
            for group in entry.groups.iter().filter_map(|id| self.group(*id)) {
                if !groups.contains(&group.name) {
                    groups.push(group.name.clone());
                }
            }
        }

        (categories, groups)
    }
}
