//! 单次扫描的证据包
//! 由采集层组装，匹配层只读
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

/// 键 → 多值 证据映射（headers / cookies / meta / dns）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceMap {
    entries: FxHashMap<String, Vec<String>>,
    case_insensitive: bool,
}

impl EvidenceMap {
    /// 区分大小写的映射（cookies、js）
    pub fn new() -> Self {
        Self::default()
    }

    /// 键不区分大小写的映射（headers、meta、dns 记录类型）
    pub fn case_insensitive() -> Self {
        Self {
            entries: FxHashMap::default(),
            case_insensitive: true,
        }
    }

    fn normalize<'a>(&self, key: &'a str) -> std::borrow::Cow<'a, str> {
        if self.case_insensitive && key.bytes().any(|b| b.is_ascii_uppercase()) {
            std::borrow::Cow::Owned(key.to_ascii_lowercase())
        } else {
            std::borrow::Cow::Borrowed(key)
        }
    }

    /// 追加一个值；同名键的重复值按出现顺序保留
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = self.normalize(key).into_owned();
        self.entries.entry(key).or_default().push(value.into());
    }

    /// 声明一个键（值列表可为空）
    pub fn insert_all<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = self.normalize(key).into_owned();
        self.entries
            .entry(key)
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(self.normalize(key).as_ref()).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(self.normalize(key).as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// 从脚本中解析出的字面量值
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Bool(bool),
    Null,
    Str(String),
    Array(Vec<JsValue>),
    /// 数字、对象字面量、表达式等，保留原文
    Raw(String),
}

impl JsValue {
    /// 是否为"假值"（短键清理时使用）
    pub fn is_falsy(&self) -> bool {
        match self {
            JsValue::Bool(b) => !b,
            JsValue::Null => true,
            JsValue::Str(s) | JsValue::Raw(s) => s.is_empty(),
            JsValue::Array(items) => items.is_empty(),
        }
    }

    /// 转换为匹配候选字符串；数组按元素展开
    pub fn candidates(&self) -> Vec<String> {
        match self {
            JsValue::Array(items) => items.iter().map(JsValue::as_text).collect(),
            other => vec![other.as_text()],
        }
    }

    fn as_text(&self) -> String {
        match self {
            JsValue::Bool(b) => b.to_string(),
            JsValue::Null => String::new(),
            JsValue::Str(s) | JsValue::Raw(s) => s.clone(),
            JsValue::Array(items) => items
                .iter()
                .map(JsValue::as_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// 单个全局变量绑定，`level` 为提取器给出的置信等级
#[derive(Debug, Clone, PartialEq)]
pub struct JsBinding {
    pub value: JsValue,
    pub level: i8,
}

/// 单个脚本的提取结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsGlobals {
    /// 声明/赋值得到的全局名
    pub primary: FxHashMap<String, JsBinding>,
    /// 对象字面量键（低置信）
    pub secondary: FxHashMap<String, JsBinding>,
    /// `classList.add(...)` 添加的类名
    pub classes: FxHashSet<String>,
}

impl JsGlobals {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty() && self.classes.is_empty()
    }
}

/// 已解析文档的选择器查询能力
pub trait DomQuery: Send + Sync {
    /// 选择器至少命中一个元素；无效选择器返回 false
    fn select_exists(&self, selector: &str) -> bool;
}

impl fmt::Debug for dyn DomQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DomQuery")
    }
}

/// 单个目标的全部证据
#[derive(Debug, Clone, Default)]
pub struct EvidenceBundle {
    /// 最终（跟随重定向后）的 URL
    pub url: String,
    pub html: String,
    pub headers: EvidenceMap,
    pub cookies: EvidenceMap,
    pub meta: EvidenceMap,
    /// 绝对化后的脚本地址（同时作为 xhr 证据）
    pub script_src: Vec<String>,
    /// 每个脚本一份提取结果，按采集顺序
    pub js: Vec<JsGlobals>,
    /// None 表示未采集
    pub dns: Option<EvidenceMap>,
    pub robots: Option<String>,
    pub cert_issuer: String,
    pub dom: Option<Arc<dyn DomQuery>>,
}

impl EvidenceBundle {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            headers: EvidenceMap::case_insensitive(),
            cookies: EvidenceMap::new(),
            meta: EvidenceMap::case_insensitive(),
            ..Self::default()
        }
    }
}
