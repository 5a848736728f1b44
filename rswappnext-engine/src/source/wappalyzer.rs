//! Wappalyzer 格式技术库解析
//! technologies.json / categories.json / groups.json → SignatureDb
//! 单条技术的字段形态不合法时跳过该字段并告警，不影响整个库的加载
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{
    CategoryEntry, DomRule, GroupEntry, KeyedRule, PatternRule, RulePattern, SignatureDb,
    TechSignature,
};
use crate::error::{CoreError, CoreResult};

/// Wappalyzer 原始技术规则
/// 规则字段保留为 Value，由宽松转换函数逐个处理
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WappalyzerOriginalTechRule {
    #[serde(default)]
    pub cats: Option<Value>,

    #[serde(rename = "certIssuer", default)]
    pub cert_issuer: Option<Value>,
    #[serde(rename = "scriptSrc", default)]
    pub script_src: Option<Value>,
    #[serde(default)]
    pub dom: Option<Value>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub xhr: Option<Value>,
    #[serde(default)]
    pub html: Option<Value>,
    #[serde(default)]
    pub js: Option<Value>,
    #[serde(default)]
    pub cookies: Option<Value>,
    #[serde(default)]
    pub headers: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub dns: Option<Value>,
    #[serde(default)]
    pub robots: Option<Value>,

    #[serde(default)]
    pub implies: Option<Value>,
    #[serde(default)]
    pub requires: Option<Value>,
    #[serde(default)]
    pub excludes: Option<Value>,

    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub cpe: Option<String>,
    #[serde(default)]
    pub saas: Option<bool>,
    #[serde(default)]
    pub pricing: Option<Vec<String>>,
}

/// Wappalyzer 规则解析器
#[derive(Debug, Clone, Default)]
pub struct WappalyzerParser;

impl WappalyzerParser {
    /// 解析技术定义
    /// 兼容顶层直接是 `{名称: {...}}`，或包裹在 `technologies` / `apps` 下
    pub fn parse_technologies(content: &str) -> CoreResult<Vec<TechSignature>> {
        let root: Value = serde_json::from_str(content)?;
        let Value::Object(mut root) = root else {
            return Err(CoreError::RuleLoadError(
                "technologies file must be a JSON object".to_string(),
            ));
        };

        let techs = match root.remove("technologies").or_else(|| root.remove("apps")) {
            Some(Value::Object(inner)) => inner,
            Some(_) => {
                return Err(CoreError::RuleLoadError(
                    "`technologies` must be a JSON object".to_string(),
                ))
            }
            None => root,
        };

        let mut signatures = Vec::with_capacity(techs.len());
        for (name, value) in techs {
            match serde_json::from_value::<WappalyzerOriginalTechRule>(value) {
                Ok(original) => signatures.push(Self::convert_tech(name, original)),
                Err(e) => warn!("Tech skipped: {} | {}", name, e),
            }
        }

        debug!("Parsed {} technologies", signatures.len());
        Ok(signatures)
    }

    /// 解析分类定义：`{"1": {"name": "CMS", "groups": [3], "priority": 1}}`
    pub fn parse_categories(content: &str) -> CoreResult<FxHashMap<u32, CategoryEntry>> {
        let raw: FxHashMap<String, CategoryEntry> = serde_json::from_str(content)?;
        Ok(Self::numeric_keys(raw, "category"))
    }

    /// 解析分组定义：`{"1": {"name": "Communication"}}`
    pub fn parse_groups(content: &str) -> CoreResult<FxHashMap<u32, GroupEntry>> {
        let raw: FxHashMap<String, GroupEntry> = serde_json::from_str(content)?;
        Ok(Self::numeric_keys(raw, "group"))
    }

    /// 三份 JSON 一次性组装为只读签名库
    pub fn parse_database(technologies: &str, categories: &str, groups: &str) -> CoreResult<SignatureDb> {
        Ok(SignatureDb::new(
            Self::parse_technologies(technologies)?,
            Self::parse_categories(categories)?,
            Self::parse_groups(groups)?,
        ))
    }

    fn numeric_keys<T>(raw: FxHashMap<String, T>, kind: &str) -> FxHashMap<u32, T> {
        raw.into_iter()
            .filter_map(|(id, entry)| match id.trim().parse::<u32>() {
                Ok(id) => Some((id, entry)),
                Err(_) => {
                    warn!("Non-numeric {} id skipped: {}", kind, id);
                    None
                }
            })
            .collect()
    }

    fn convert_tech(name: String, original: WappalyzerOriginalTechRule) -> TechSignature {
        let field = |field: &str| format!("{}.{}", name, field);

        TechSignature {
            categories: value_to_category_ids(original.cats.as_ref()),
            requires: value_to_relation(original.requires.as_ref()),
            implies: value_to_relation(original.implies.as_ref()),
            excludes: value_to_relation(original.excludes.as_ref()),

            cert_issuer: value_to_pattern_rule(original.cert_issuer.as_ref(), &field("certIssuer")),
            script_src: value_to_pattern_rule(original.script_src.as_ref(), &field("scriptSrc")),
            dom: value_to_dom_rule(original.dom.as_ref(), &field("dom")),
            meta: value_to_keyed_rule(original.meta.as_ref(), &field("meta")),
            xhr: value_to_pattern_rule(original.xhr.as_ref(), &field("xhr")),
            html: value_to_pattern_rule(original.html.as_ref(), &field("html")),
            js: value_to_keyed_rule(original.js.as_ref(), &field("js")),
            cookies: value_to_keyed_rule(original.cookies.as_ref(), &field("cookies")),
            headers: value_to_keyed_rule(original.headers.as_ref(), &field("headers")),
            url: value_to_pattern_rule(original.url.as_ref(), &field("url")),
            dns: value_to_keyed_rule(original.dns.as_ref(), &field("dns")),
            robots: value_to_pattern_rule(original.robots.as_ref(), &field("robots")),

            #[cfg(feature = "full-meta")]
            website: original.website,
            #[cfg(feature = "full-meta")]
            description: original.description,
            #[cfg(feature = "full-meta")]
            icon: original.icon,
            #[cfg(feature = "full-meta")]
            cpe: original.cpe,
            #[cfg(feature = "full-meta")]
            saas: original.saas,
            #[cfg(feature = "full-meta")]
            pricing: original.pricing,

            name,
        }
    }
}

/// 字符串 → Single；字符串数组 → List；其余形态跳过
pub fn value_to_pattern_rule(value: Option<&Value>, field: &str) -> Option<PatternRule> {
    match value? {
        Value::String(s) => Some(PatternRule::single(s.as_str())),
        Value::Array(items) => {
            let list = string_items(items, field);
            if list.is_empty() {
                None
            } else {
                Some(PatternRule::List(list.into_iter().map(RulePattern::new).collect()))
            }
        }
        Value::Null => None,
        other => {
            warn!("Unsupported rule shape skipped: {} = {}", field, other);
            None
        }
    }
}

/// 对象 → KeyedRule，键序保持原样
pub fn value_to_keyed_rule(value: Option<&Value>, field: &str) -> Option<KeyedRule> {
    let map = match value? {
        Value::Object(map) => map,
        Value::Null => return None,
        other => {
            warn!("Keyed rule must be an object: {} = {}", field, other);
            return None;
        }
    };

    let rule: KeyedRule = map
        .iter()
        .filter_map(|(key, v)| {
            let sub = format!("{}.{}", field, key);
            value_to_pattern_rule(Some(v), &sub).map(|rule| (key.clone(), rule))
        })
        .collect();

    (!rule.is_empty()).then_some(rule)
}

/// DOM 规则三种形态：
/// - 字符串：单个选择器
/// - 字符串数组：选择器列表
/// - 对象：值为字符串时以值为选择器；值为对象（exists / text / attributes）时以键为选择器
pub fn value_to_dom_rule(value: Option<&Value>, field: &str) -> Option<DomRule> {
    match value? {
        Value::String(s) => Some(DomRule::Selector(RulePattern::new(s.as_str()))),
        Value::Array(items) => {
            let list = string_items(items, field);
            (!list.is_empty()).then(|| DomRule::Selectors(list.into_iter().map(RulePattern::new).collect()))
        }
        Value::Object(map) => {
            let entries = keyed_dom_entries(map);
            (!entries.is_empty()).then_some(DomRule::Keyed(entries))
        }
        Value::Null => None,
        other => {
            warn!("Unsupported dom rule skipped: {} = {}", field, other);
            None
        }
    }
}

fn keyed_dom_entries(map: &Map<String, Value>) -> Vec<(String, RulePattern)> {
    map.iter()
        .filter_map(|(key, v)| match v {
            Value::String(selector) => Some((key.clone(), RulePattern::new(selector.as_str()))),
            Value::Object(_) => Some((key.clone(), RulePattern::new(key.as_str()))),
            _ => None,
        })
        .collect()
}

/// 关联关系（implies / requires / excludes）：字符串或字符串数组，去掉 `\;` 之后的指令
pub fn value_to_relation(value: Option<&Value>) -> Vec<String> {
    let names: Vec<&str> = match value {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    let mut relations: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.split("\\;").next().unwrap_or_default().trim();
        if !name.is_empty() && !relations.iter().any(|r| r == name) {
            relations.push(name.to_string());
        }
    }
    relations
}

/// cats 兼容数字与数字字符串
fn value_to_category_ids(value: Option<&Value>) -> Vec<u32> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

fn string_items<'a>(items: &'a [Value], field: &str) -> Vec<&'a str> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            other => {
                warn!("Non-string pattern skipped: {} = {}", field, other);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TECHNOLOGIES: &str = r#"{
        "Nginx": {
            "cats": [22, 64],
            "headers": { "Server": "nginx(?:/([\\d.]+))?\\;version:\\1" },
            "implies": "C\\;confidence:50"
        },
        "jQuery": {
            "cats": ["59"],
            "scriptSrc": ["jquery-(\\d+(?:\\.\\d+)+)\\;version:\\1", "/jquery(?:\\.min)?\\.js"],
            "js": { "jQuery.fn.jquery": "([\\d.]+)\\;version:\\1" },
            "dom": { "script[data-jquery]": { "exists": "" }, "marker": "div.jq" }
        },
        "Broken": "not an object"
    }"#;

    #[test]
    fn test_parse_technologies_plain_object() {
        let sigs = WappalyzerParser::parse_technologies(TECHNOLOGIES).unwrap();
        assert_eq!(sigs.len(), 2);

        let nginx = &sigs[0];
        assert_eq!(nginx.name, "Nginx");
        assert_eq!(nginx.categories, vec![22, 64]);
        assert_eq!(nginx.implies, vec!["C"]);
        let headers = nginx.headers.as_ref().unwrap();
        assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["Server"]);

        let jquery = &sigs[1];
        assert_eq!(jquery.categories, vec![59]);
        assert_eq!(jquery.script_src.as_ref().unwrap().patterns().len(), 2);
        let dom = jquery.dom.as_ref().unwrap();
        let selectors: Vec<_> = dom.selectors().iter().map(|p| p.raw()).collect();
        assert_eq!(selectors, vec!["script[data-jquery]", "div.jq"]);
    }

    #[test]
    fn test_parse_technologies_wrapped_forms() {
        let wrapped = r#"{"technologies": {"PHP": {"cats": [27], "url": "\\.php"}}}"#;
        let apps = r#"{"apps": {"PHP": {"cats": [27], "url": "\\.php"}}}"#;
        for content in [wrapped, apps] {
            let sigs = WappalyzerParser::parse_technologies(content).unwrap();
            assert_eq!(sigs.len(), 1);
            assert!(sigs[0].url.is_some());
        }
    }

    #[test]
    fn test_parse_technologies_rejects_non_object() {
        assert!(matches!(
            WappalyzerParser::parse_technologies("[1, 2]"),
            Err(CoreError::RuleLoadError(_))
        ));
        assert!(matches!(
            WappalyzerParser::parse_technologies("{"),
            Err(CoreError::JsonError(_))
        ));
    }

    #[test]
    fn test_malformed_fields_are_skipped() {
        let value = json!({ "html": 42, "meta": ["generator"], "cookies": { "sid": "", "bad": 1 } });
        let original: WappalyzerOriginalTechRule = serde_json::from_value(value).unwrap();
        let sig = WappalyzerParser::convert_tech("X".into(), original);

        assert!(sig.html.is_none());
        assert!(sig.meta.is_none());
        let cookies = sig.cookies.unwrap();
        assert_eq!(cookies.len(), 1);
        assert!(cookies.iter().next().unwrap().1.is_presence_sentinel());
    }

    #[test]
    fn test_relations_strip_directives_and_dedup() {
        let value = json!(["PHP\\;confidence:50", "PHP", " MySQL ", ""]);
        assert_eq!(value_to_relation(Some(&value)), vec!["PHP", "MySQL"]);
        assert!(value_to_relation(None).is_empty());
    }

    #[test]
    fn test_parse_categories_and_groups() {
        let cats = WappalyzerParser::parse_categories(
            r#"{"1": {"name": "CMS", "groups": [3], "priority": 1}, "x": {"name": "Bad"}, "22": {"name": "Web servers"}}"#,
        )
        .unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[&1].groups, vec![3]);
        assert!(cats[&22].groups.is_empty());

        let groups = WappalyzerParser::parse_groups(r#"{"3": {"name": "Content"}}"#).unwrap();
        assert_eq!(groups[&3].name, "Content");
    }

    #[test]
    fn test_parse_database_resolves_labels() {
        let db = WappalyzerParser::parse_database(
            TECHNOLOGIES,
            r#"{"22": {"name": "Web servers", "groups": [7]}}"#,
            r#"{"7": {"name": "Servers"}}"#,
        )
        .unwrap();
        assert_eq!(db.len(), 2);
        let (cats, groups) = db.resolve_labels("Nginx");
        assert_eq!(cats, vec!["Web servers"]);
        assert_eq!(groups, vec!["Servers"]);
    }
}
