//! 版本模板
//! 支持三种写法：
//! - `\1`：直接取分组
//! - `\1?next:legacy`：分组存在且非空取 then，否则取 else（任一侧可为空）
//! - `v\1.\2`：字面量与分组引用混排，每个 `\N` 都替换为对应分组（缺失为空）
//!
//! 没有任何引用的纯字面量模板产出空版本。
use regex::Captures;

/// 截断版本号的字符
const VERSION_TERMINATORS: [char; 4] = [')', ']', '}', ','];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionTemplate {
    #[default]
    Empty,
    Interpolate(String),
    Conditional {
        group: usize,
        then: String,
        otherwise: String,
    },
}

impl VersionTemplate {
    pub fn parse(template: &str) -> Self {
        if template.is_empty() {
            return VersionTemplate::Empty;
        }

        if let Some((condition, rest)) = template.split_once('?') {
            if let Some(group) = parse_bare_reference(condition.trim()) {
                let (then, otherwise) = rest.split_once(':').unwrap_or((rest, ""));
                return VersionTemplate::Conditional {
                    group,
                    then: then.to_string(),
                    otherwise: otherwise.to_string(),
                };
            }
        }

        if template.contains('\\') {
            VersionTemplate::Interpolate(template.to_string())
        } else {
            VersionTemplate::Empty
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, VersionTemplate::Empty)
    }

    /// 用捕获结果渲染版本号，并做统一清理
    pub fn render(&self, captures: &Captures<'_>) -> String {
        let assembled = match self {
            VersionTemplate::Empty => return String::new(),
            VersionTemplate::Interpolate(template) => substitute(template, captures),
            VersionTemplate::Conditional {
                group,
                then,
                otherwise,
            } => {
                let present = captures
                    .get(*group)
                    .is_some_and(|m| !m.as_str().is_empty());
                substitute(if present { then } else { otherwise }, captures)
            }
        };

        clean_version(&assembled)
    }
}

/// `\N` 形式（且仅此形式）返回 N
fn parse_bare_reference(s: &str) -> Option<usize> {
    let digits = s.strip_prefix('\\')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// 替换所有 `\N` 引用
fn substitute(template: &str, captures: &Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let start = idx + 1;
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            end = i + 1;
            chars.next();
        }

        if end == start {
            out.push(ch);
            continue;
        }

        if let Some(m) = template[start..end]
            .parse::<usize>()
            .ok()
            .and_then(|group| captures.get(group))
        {
            out.push_str(m.as_str());
        }
    }

    out
}

/// 去掉引号，截断到第一个结束括号/逗号，去除首尾空白
fn clean_version(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let unquoted: String = raw.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let cut = unquoted
        .find(VERSION_TERMINATORS)
        .map_or(unquoted.as_str(), |pos| &unquoted[..pos]);
    cut.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn render(template: &str, pattern: &str, input: &str) -> String {
        let re = Regex::new(pattern).unwrap();
        let caps = re.captures(input).unwrap();
        VersionTemplate::parse(template).render(&caps)
    }

    #[test]
    fn test_extract_bare_reference() {
        assert_eq!(render(r"\1", r"nginx/([\d.]+)", "nginx/1.25.3"), "1.25.3");
    }

    #[test]
    fn test_extract_conditional_else_only() {
        let pattern = r"lib(?:-([\d.]+))?\.js";
        assert_eq!(render(r"\1?:unknown", pattern, "lib-2.3.js"), "");
        assert_eq!(render(r"\1?:unknown", pattern, "lib.js"), "unknown");
    }

    #[test]
    fn test_extract_conditional_both_branches() {
        let pattern = r"app(-next)?\.js";
        assert_eq!(render(r"\1?next:classic", pattern, "app-next.js"), "next");
        assert_eq!(render(r"\1?next:classic", pattern, "app.js"), "classic");
        assert_eq!(render(r"\1?next:", pattern, "app.js"), "");
    }

    #[test]
    fn test_extract_interpolated_references() {
        let pattern = r"v(\d+)_(\d+)";
        assert_eq!(render(r"\1.\2", pattern, "v4_7"), "4.7");
        assert_eq!(render(r"release-\1", pattern, "v4_7"), "release-4");
        // 未参与匹配的分组替换为空
        assert_eq!(render(r"\1.\3", pattern, "v4_7"), "4.");
    }

    #[test]
    fn test_extract_cleans_quotes_and_brackets() {
        assert_eq!(render(r"\1", r#"ver=(\S+)"#, r#"ver="1.2.3")"#), "1.2.3");
        assert_eq!(render(r"\1", r"ver=(\S+)", "ver=5.0],x"), "5.0");
    }

    #[test]
    fn test_literal_only_template_is_empty() {
        assert_eq!(render("2", r"wp-(\d)", "wp-5"), "");
        assert!(VersionTemplate::parse("").is_empty());
    }
}
