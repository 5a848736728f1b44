//! 脚本全局变量提取
//! 不做完整解析，只用四类赋值模式近似识别页面暴露的全局名：
//! 1. `var|let|const name = value`
//! 2. `window.name = value`
//! 3. `globalThis.name = value`
//! 4. 语句开头或 `{ ; ,` 之后的 `name = value` / `name: value`
//!
//! 第 4 类中的冒号形式是对象字面量键，进入低置信映射。
use once_cell::sync::Lazy;
use regex::Regex;

use super::splitter::split_statements;
use crate::core::{JsBinding, JsGlobals, JsValue};

const BASE_LEVEL: i8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Declaration,
    WindowProperty,
    GlobalThisProperty,
    BareAssignment,
}

static FAMILIES: Lazy<[(Family, Regex); 4]> = Lazy::new(|| {
    [
        (
            Family::Declaration,
            Regex::new(r"(?:var|let|const)\s+([a-zA-Z_$][a-zA-Z0-9_$]*)\s*=\s*([^;]+)").unwrap(),
        ),
        (
            Family::WindowProperty,
            Regex::new(r"window\.([a-zA-Z_$][a-zA-Z0-9_$]*)\s*=\s*([^;]+)").unwrap(),
        ),
        (
            Family::GlobalThisProperty,
            Regex::new(r"globalThis\.([a-zA-Z_$][a-zA-Z0-9_$]*)\s*=\s*([^;]+)").unwrap(),
        ),
        (
            Family::BareAssignment,
            Regex::new(r"(?m)(?:^|[{;,])([a-zA-Z_$][a-zA-Z0-9_$]*)\s*([=:])\s*([^;,}]+)").unwrap(),
        ),
    ]
});

static FUNCTION_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"function\s*\(.*\)\s*\{").unwrap());
static CLASS_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"class\s+").unwrap());
static CLASS_LIST_ADD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"classList\.add\(['"]([^'"]+)"#).unwrap());

/// 全局变量提取器（无状态）
pub struct JsGlobalExtractor;

impl JsGlobalExtractor {
    pub fn extract(source: &str) -> JsGlobals {
        let mut globals = JsGlobals::default();

        for statement in split_statements(source) {
            for (family, regex) in FAMILIES.iter() {
                for caps in regex.captures_iter(&statement) {
                    let name = &caps[1];
                    let level = Self::name_level(name);

                    if *family == Family::Declaration
                        && (FUNCTION_BODY.is_match(&statement) || CLASS_BODY.is_match(&statement))
                    {
                        continue;
                    }

                    let (separator, value) = match family {
                        Family::BareAssignment => (&caps[2], &caps[3]),
                        _ => ("=", &caps[2]),
                    };

                    if separator == ":" {
                        if name.starts_with("http") && value.starts_with("//") {
                            continue;
                        }
                        let level = level - 1;
                        if level <= 0 {
                            continue;
                        }
                        globals.secondary.insert(
                            name.to_string(),
                            JsBinding {
                                value: parse_value(value),
                                level,
                            },
                        );
                        continue;
                    }

                    globals.primary.insert(
                        name.to_string(),
                        JsBinding {
                            value: parse_value(value),
                            level,
                        },
                    );
                }
            }
        }

        globals.classes = CLASS_LIST_ADD
            .captures_iter(source)
            .map(|caps| caps[1].to_string())
            .collect();

        globals
    }

    /// 名字越短越可能是压缩后的局部变量
    fn name_level(name: &str) -> i8 {
        match name.chars().count() {
            0..=3 => BASE_LEVEL - 2,
            4..=5 => BASE_LEVEL - 1,
            _ => BASE_LEVEL,
        }
    }
}

/// 字面量归一化：布尔、null/undefined、引号字符串、浅层数组，其余保留原文
pub fn parse_value(raw: &str) -> JsValue {
    let trimmed = raw.trim();
    let value = trimmed.strip_suffix(',').unwrap_or(trimmed);

    if value.eq_ignore_ascii_case("true") {
        return JsValue::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return JsValue::Bool(false);
    }
    if value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("undefined") {
        return JsValue::Null;
    }

    let quoted = |q: char| value.starts_with(q) && value.ends_with(q);
    if quoted('"') || quoted('\'') {
        return JsValue::Str(inner(value).to_string());
    }

    if value.starts_with('[') && value.ends_with(']') && value.len() >= 2 {
        let items = inner(value)
            .split(',')
            .filter(|item| !item.trim().is_empty())
            .map(parse_value)
            .collect();
        return JsValue::Array(items);
    }

    JsValue::Raw(value.to_string())
}

/// 去掉首尾各一个 ASCII 字符；长度不足时为空
fn inner(value: &str) -> &str {
    if value.len() < 2 {
        return "";
    }
    &value[1..value.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_value(globals: &JsGlobals, name: &str) -> Option<JsValue> {
        globals.primary.get(name).map(|b| b.value.clone())
    }

    #[test]
    fn test_extract_mixed_statements() {
        let globals = JsGlobalExtractor::extract(r#"var a = 1; b.c = "x"; obj = {k: 1};"#);
        assert_eq!(primary_value(&globals, "a"), Some(JsValue::Raw("1".into())));
        assert_eq!(globals.primary.get("a").map(|b| b.level), Some(1));
        assert!(globals.primary.contains_key("obj"));
        assert!(!globals.primary.contains_key("c"));
    }

    #[test]
    fn test_extract_window_and_global_this() {
        let globals = JsGlobalExtractor::extract(
            r#"window.jQuery = "3.7.1"; globalThis.__NUXT__ = true; const Shopify = {};"#,
        );
        assert_eq!(primary_value(&globals, "jQuery"), Some(JsValue::Str("3.7.1".into())));
        assert_eq!(globals.primary.get("jQuery").map(|b| b.level), Some(3));
        assert_eq!(primary_value(&globals, "__NUXT__"), Some(JsValue::Bool(true)));
        assert_eq!(primary_value(&globals, "Shopify"), Some(JsValue::Raw("{}".into())));
    }

    #[test]
    fn test_extract_object_keys_go_to_secondary() {
        let globals = JsGlobalExtractor::extract(r#"init({apiVersion:"2",debugMode:true,id:7});"#);
        let api = globals.secondary.get("apiVersion").unwrap();
        assert_eq!(api.value, JsValue::Str("2".into()));
        assert_eq!(api.level, 2);
        assert_eq!(
            globals.secondary.get("debugMode").map(|b| b.value.clone()),
            Some(JsValue::Bool(true))
        );
        // 短键降级到 0 被丢弃
        assert!(!globals.secondary.contains_key("id"));
        assert!(globals.primary.is_empty());
    }

    #[test]
    fn test_extract_skips_protocol_relative_url_keys() {
        let globals = JsGlobalExtractor::extract("load({https://cdn.example.com/app.js});");
        assert!(!globals.secondary.contains_key("https"));
    }

    #[test]
    fn test_extract_skips_function_and_class_declarations() {
        let globals = JsGlobalExtractor::extract(
            "var handler = function (e) { return e }; const Widget = class Base {}; let ready = 1;",
        );
        assert!(!globals.primary.contains_key("handler"));
        assert!(!globals.primary.contains_key("Widget"));
        assert_eq!(primary_value(&globals, "ready"), Some(JsValue::Raw("1".into())));
    }

    #[test]
    fn test_extract_class_tokens() {
        let globals = JsGlobalExtractor::extract(
            r#"el.classList.add('is-ready'); document.body.classList.add("dark-mode");"#,
        );
        assert!(globals.classes.contains("is-ready"));
        assert!(globals.classes.contains("dark-mode"));
        assert_eq!(globals.classes.len(), 2);
    }

    #[test]
    fn test_parse_value_forms() {
        assert_eq!(parse_value(" TRUE "), JsValue::Bool(true));
        assert_eq!(parse_value("undefined"), JsValue::Null);
        assert_eq!(parse_value("'v2',"), JsValue::Str("v2".into()));
        assert_eq!(parse_value("\""), JsValue::Str(String::new()));
        assert_eq!(
            parse_value("[1, 'a', ]"),
            JsValue::Array(vec![JsValue::Raw("1".into()), JsValue::Str("a".into())])
        );
        assert_eq!(parse_value("[]"), JsValue::Array(vec![]));
        assert_eq!(parse_value("{a: 1}"), JsValue::Raw("{a: 1}".into()));
    }

    #[test]
    fn test_extract_never_panics_on_garbage() {
        for input in ["", ";;;", "=", "var = ;", "window.", "{:,}", "'\"`\\", "a = \u{00e9}\u{4e2d};"] {
            let _ = JsGlobalExtractor::extract(input);
        }
    }
}
