use super::matcher::RuleMatcher;
use crate::core::{EvidenceMap, KeyedRule, MatchOutcome};

/// 键控规则匹配器
/// 按规则声明顺序遍历键，证据中存在的键逐值匹配，第一个命中即返回
pub struct DictMatcher;

impl DictMatcher {
    pub fn match_dict(rules: &KeyedRule, evidence: &EvidenceMap) -> MatchOutcome {
        for (key, rule) in rules.iter() {
            let Some(values) = evidence.get(key) else {
                continue;
            };

            for value in values {
                // 空模式只要求键存在
                if rule.is_presence_sentinel() {
                    return MatchOutcome::hit("", 100);
                }

                let outcome = RuleMatcher::match_rule(rule, std::slice::from_ref(value));
                if outcome.matched {
                    return outcome;
                }
            }
        }

        MatchOutcome::miss()
    }
}
