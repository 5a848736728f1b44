//! 规则形态定义
//! 技术库中每个证据类别的规则只有三种形态：单模式、模式列表、键控映射
//! 这里用标签联合表达，匹配器按形态分派，不做运行时类型探测
use once_cell::sync::OnceCell;

use crate::pattern::{CompiledRule, PatternCompiler};
use crate::utils::preview_compact;

/// 单条原始模式（含 `\;confidence:` / `\;version:` 指令）
/// 编译结果首次使用时生成并缓存，之后只读
#[derive(Debug, Clone)]
pub struct RulePattern {
    raw: String,
    compiled: OnceCell<Option<CompiledRule>>,
}

impl RulePattern {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            compiled: OnceCell::new(),
        }
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 获取编译结果；指令损坏的模式返回 None（视为永不匹配）
    pub fn compiled(&self) -> Option<&CompiledRule> {
        self.compiled
            .get_or_init(|| match PatternCompiler::compile(&self.raw) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    log::warn!(
                        "Pattern ignored: {} | raw={}",
                        e,
                        preview_compact(&self.raw, 120)
                    );
                    None
                }
            })
            .as_ref()
    }
}

impl PartialEq for RulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl From<&str> for RulePattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RulePattern {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// 标量类别规则：单模式或模式列表
#[derive(Debug, Clone, PartialEq)]
pub enum PatternRule {
    Single(RulePattern),
    List(Vec<RulePattern>),
}

impl PatternRule {
    pub fn single(raw: impl Into<String>) -> Self {
        PatternRule::Single(RulePattern::new(raw))
    }

    pub fn list<I, S>(raws: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PatternRule::List(raws.into_iter().map(RulePattern::new).collect())
    }

    /// 按声明顺序返回全部模式
    pub fn patterns(&self) -> &[RulePattern] {
        match self {
            PatternRule::Single(p) => std::slice::from_ref(p),
            PatternRule::List(list) => list,
        }
    }

    /// 空字符串单模式：仅表示"键存在"
    #[inline]
    pub fn is_presence_sentinel(&self) -> bool {
        matches!(self, PatternRule::Single(p) if p.raw().is_empty())
    }
}

/// 键控规则（meta / cookies / headers / dns / js），保留声明顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedRule {
    entries: Vec<(String, PatternRule)>,
}

impl KeyedRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, rule: PatternRule) {
        self.entries.push((key.into(), rule));
    }

    /// 链式构建，便于测试与手工组装
    pub fn with(mut self, key: impl Into<String>, rule: PatternRule) -> Self {
        self.push(key, rule);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternRule)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, PatternRule)> for KeyedRule {
    fn from_iter<T: IntoIterator<Item = (String, PatternRule)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// DOM 规则：选择器、选择器列表、或"名称 → 选择器"映射
#[derive(Debug, Clone, PartialEq)]
pub enum DomRule {
    Selector(RulePattern),
    Selectors(Vec<RulePattern>),
    Keyed(Vec<(String, RulePattern)>),
}

impl DomRule {
    /// 按声明顺序展开为选择器模式（键控形态只取值）
    pub fn selectors(&self) -> Vec<&RulePattern> {
        match self {
            DomRule::Selector(p) => vec![p],
            DomRule::Selectors(list) => list.iter().collect(),
            DomRule::Keyed(entries) => entries.iter().map(|(_, p)| p).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_sentinel_only_for_single_empty() {
        assert!(PatternRule::single("").is_presence_sentinel());
        assert!(!PatternRule::list([""]).is_presence_sentinel());
        assert!(!PatternRule::single("nginx").is_presence_sentinel());
    }

    #[test]
    fn test_keyed_rule_keeps_order() {
        let rule = KeyedRule::new()
            .with("x-powered-by", PatternRule::single("PHP"))
            .with("server", PatternRule::single("nginx"));
        let keys: Vec<_> = rule.keys().collect();
        assert_eq!(keys, vec!["x-powered-by", "server"]);
    }

    #[test]
    fn test_broken_directive_compiles_to_none() {
        let pattern = RulePattern::new(r"jquery\;confidence:abc");
        assert!(pattern.compiled().is_none());
        assert!(RulePattern::new(r"jquery\;confidence:20").compiled().is_some());
    }

    #[test]
    fn test_dom_selectors_flatten() {
        let rule = DomRule::Keyed(vec![
            ("app".to_string(), RulePattern::new("#app")),
            ("root".to_string(), RulePattern::new("div[data-v-app]")),
        ]);
        let raws: Vec<_> = rule.selectors().iter().map(|p| p.raw()).collect();
        assert_eq!(raws, vec!["#app", "div[data-v-app]"]);
    }
}
