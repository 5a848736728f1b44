//! 脚本全局变量匹配
use rustc_hash::{FxHashMap, FxHashSet};

use super::{hit_only, Analyzer};
use crate::core::{
    EvidenceBundle, EvidenceCategory, EvidenceMap, JsBinding, JsGlobals, JsValue, KeyedRule,
    MatchOutcome, TechSignature,
};
use crate::pattern::DictMatcher;

pub struct JsAnalyzer;

impl Analyzer for JsAnalyzer {
    const CATEGORY: EvidenceCategory = EvidenceCategory::Js;

    /// 逐个脚本匹配，第一个命中的脚本决定结果
    fn analyze(signature: &TechSignature, evidence: &EvidenceBundle) -> Vec<MatchOutcome> {
        let Some(rules) = &signature.js else {
            return Vec::new();
        };

        evidence
            .js
            .iter()
            .map(|script| match_script(rules, script))
            .find(|outcome| outcome.matched)
            .map(hit_only)
            .unwrap_or_default()
    }
}

/// 单个脚本：先主映射，再未被主映射覆盖的低置信映射
pub fn match_script(rules: &KeyedRule, script: &JsGlobals) -> MatchOutcome {
    let primary = normalize_names(rules, &script.primary, &script.classes);
    let mut secondary = normalize_names(rules, &script.secondary, &script.classes);
    secondary.retain(|name, _| !primary.contains_key(name));

    let outcome = DictMatcher::match_dict(rules, &to_evidence(&primary));
    if outcome.matched {
        return outcome;
    }
    DictMatcher::match_dict(rules, &to_evidence(&secondary))
}

/// 规则键名对齐
/// - 点号键（如 `Foo.bar`）的每一段都出现在 classList 类名中时，
///   把被该键包含的提取名改名为这个点号键
/// - 长度 ≤ 2 且值为假的名字视为压缩噪声，移除
fn normalize_names<'a>(
    rules: &KeyedRule,
    bindings: &'a FxHashMap<String, JsBinding>,
    classes: &FxHashSet<String>,
) -> FxHashMap<String, &'a JsValue> {
    let mut names: FxHashMap<String, &JsValue> = bindings
        .iter()
        .map(|(name, binding)| (name.clone(), &binding.value))
        .collect();

    for key in rules.keys().filter(|key| key.contains('.')) {
        if !key.split('.').all(|segment| classes.contains(segment)) {
            continue;
        }

        let mut contained: Vec<&String> = bindings
            .keys()
            .filter(|name| key.contains(name.as_str()) && names.contains_key(name.as_str()))
            .collect();
        contained.sort();

        if let Some(value) = contained.first().and_then(|name| names.remove(name.as_str())) {
            names.insert(key.to_string(), value);
        }
    }

    for (name, binding) in bindings {
        if name.chars().count() <= 2 && binding.value.is_falsy() {
            names.remove(name);
        }
    }

    names
}

fn to_evidence(names: &FxHashMap<String, &JsValue>) -> EvidenceMap {
    let mut evidence = EvidenceMap::new();
    for (name, value) in names {
        evidence.insert_all(name, value.candidates());
    }
    evidence
}
