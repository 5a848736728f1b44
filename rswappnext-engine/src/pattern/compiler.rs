//! 模式编译器
//! 把原始模式拆成：干净的模式文本、版本模板、置信度
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use super::regex_repair::build_regex;
use super::version::VersionTemplate;
use crate::error::{CoreError, CoreResult};

const CONFIDENCE_MARKER: &str = r"\;confidence:";
const VERSION_MARKER: &str = r"\;version:";
const DEFAULT_CONFIDENCE: u8 = 100;

static CONFIDENCE_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\;confidence:(\d+)").unwrap());

/// 编译后的规则
/// 正则首次匹配时才构建；DOM 规则只使用 `pattern` 作为选择器
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub pattern: String,
    pub version: VersionTemplate,
    pub confidence: u8,
    regex: OnceCell<Option<Regex>>,
}

impl CompiledRule {
    pub fn new(pattern: impl Into<String>, version: VersionTemplate, confidence: u8) -> Self {
        Self {
            pattern: pattern.into(),
            version,
            confidence,
            regex: OnceCell::new(),
        }
    }

    /// 获取正则；无法编译（含修复失败）返回 None
    pub fn regex(&self) -> Option<&Regex> {
        self.regex
            .get_or_init(|| build_regex(&self.pattern))
            .as_ref()
    }
}

/// 模式编译器（无状态）
pub struct PatternCompiler;

impl PatternCompiler {
    /// 解析置信度与版本指令
    /// - `\;confidence:N` 可出现在任意位置，所有相同指令文本都会被移除，默认 100
    /// - `\;version:` 之后（到下一个同名指令之前）为版本模板，之前为模式
    pub fn compile(raw: &str) -> CoreResult<CompiledRule> {
        let mut pattern = raw.to_string();
        let mut confidence = DEFAULT_CONFIDENCE;

        if pattern.contains(CONFIDENCE_MARKER) {
            let caps = CONFIDENCE_DIRECTIVE
                .captures(&pattern)
                .ok_or_else(|| CoreError::PatternError(format!("missing confidence value in {raw}")))?;
            let directive = caps[0].to_string();
            confidence = caps[1].parse::<u32>().map_or(DEFAULT_CONFIDENCE, |c| {
                c.min(u32::from(DEFAULT_CONFIDENCE)) as u8
            });
            pattern = pattern.replace(&directive, "");
        }

        let mut version = VersionTemplate::Empty;
        if pattern.contains(VERSION_MARKER) {
            let mut parts = pattern.split(VERSION_MARKER);
            let head = parts.next().unwrap_or_default().to_string();
            version = VersionTemplate::parse(parts.next().unwrap_or_default());
            pattern = head;
        }

        Ok(CompiledRule::new(pattern, version, confidence))
    }
}
