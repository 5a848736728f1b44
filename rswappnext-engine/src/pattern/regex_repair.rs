//! 正则构建与宽松方言修复
//! 技术库里的模式按宽松方言书写，`regex` 不接受的写法有三类：
//! 1. `\m`、`\i` 这类引擎不认识的转义：把第一个非法转义的反斜杠变成字面量
//! 2. 环视 `(?=…)` `(?!…)` `(?<=…)` `(?<!…)`：整组移除
//! 3. 不构成量词的 `{`：转义为字面量
//! 依次尝试：原模式 → 转义修复 → 方言归一 → 方言归一后再做一次转义修复
use regex::Regex;
use regex_syntax::ast::{parse::Parser, ErrorKind};

use crate::utils::preview_compact;

/// 编译正则；所有修复都失败返回 None
pub fn build_regex(pattern: &str) -> Option<Regex> {
    let first_err = match Regex::new(pattern) {
        Ok(re) => return Some(re),
        Err(e) => e,
    };

    let normalized = normalize_dialect(pattern);
    let attempts = [
        repair_escape(pattern),
        normalized.clone(),
        normalized.as_deref().and_then(repair_escape),
    ];

    for candidate in attempts.into_iter().flatten() {
        if let Ok(re) = Regex::new(&candidate) {
            log::debug!(
                "Regex repaired: {} -> {}",
                preview_compact(pattern, 120),
                preview_compact(&candidate, 120)
            );
            return Some(re);
        }
    }

    log::debug!(
        "Regex rejected: pattern={} error={}",
        preview_compact(pattern, 120),
        first_err
    );
    None
}

/// 找到第一个无法识别的转义，将其反斜杠变为字面量 `\\`
/// 不是转义问题（例如环视、反向引用）时返回 None
pub fn repair_escape(pattern: &str) -> Option<String> {
    let err = Parser::new().parse(pattern).err()?;
    match err.kind() {
        ErrorKind::EscapeUnrecognized | ErrorKind::EscapeUnexpectedEof => {}
        _ => return None,
    }

    // 错误区间可能从反斜杠或其后的字符开始
    let bytes = pattern.as_bytes();
    let start = err.span().start.offset;
    let offset = if bytes.get(start) == Some(&b'\\') {
        start
    } else if start > 0 && bytes.get(start - 1) == Some(&b'\\') {
        start - 1
    } else {
        return None;
    };

    let mut repaired = String::with_capacity(pattern.len() + 1);
    repaired.push_str(&pattern[..offset]);
    repaired.push('\\');
    repaired.push_str(&pattern[offset..]);
    Some(repaired)
}

/// 去掉环视组并转义孤立的 `{`；没有任何改动时返回 None
/// 反斜杠转义与字符集内部原样保留
pub fn normalize_dialect(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut changed = false;
    let mut in_class = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            out.extend(&chars[i..(i + 2).min(chars.len())]);
            i += 2;
            continue;
        }
        if in_class {
            in_class = c != ']';
            out.push(c);
            i += 1;
            continue;
        }
        match c {
            '[' => {
                in_class = true;
                out.push(c);
                i += 1;
                // `[^]...]` / `[]...]` 中的首个 `]` 是字面量
                if chars.get(i) == Some(&'^') {
                    out.push('^');
                    i += 1;
                }
                if chars.get(i) == Some(&']') {
                    out.push(']');
                    i += 1;
                }
            }
            '(' if is_look_around(&chars[i..]) => {
                i = group_end(&chars, i);
                changed = true;
            }
            '{' if !is_repetition(&chars[i + 1..]) => {
                out.push_str("\\{");
                i += 1;
                changed = true;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    changed.then_some(out)
}

fn is_look_around(rest: &[char]) -> bool {
    matches!(
        rest,
        ['(', '?', '=' | '!', ..] | ['(', '?', '<', '=' | '!', ..]
    )
}

/// `{n}` / `{n,}` / `{n,m}`
fn is_repetition(rest: &[char]) -> bool {
    let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return false;
    }
    match rest.get(digits) {
        Some('}') => true,
        Some(',') => {
            let tail = &rest[digits + 1..];
            let upper = tail.iter().take_while(|c| c.is_ascii_digit()).count();
            tail.get(upper) == Some(&'}')
        }
        _ => false,
    }
}

/// 从 `start` 处的 `(` 开始，返回与之配对的 `)` 之后的下标；未闭合时返回末尾
fn group_end(chars: &[char], start: usize) -> usize {
    let mut depth = 0usize;
    let mut in_class = false;
    let mut i = start;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                continue;
            }
            ']' if in_class => in_class = false,
            _ if in_class => {}
            '[' => in_class = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}
