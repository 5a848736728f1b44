//! 从脚本文本中挖掘 URL（作为额外的 scriptSrc 证据）
use once_cell::sync::Lazy;
use regex::Regex;

static URL_IN_SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:https?:)?//[\w.-]{2,}\.[a-zA-Z]{2,63}(?:[^'"\s\n]+)?"#).unwrap()
});

/// 协议相对地址（`//cdn...`）补全为 `scheme:` 前缀
pub fn extract_script_urls(scheme: &str, script: &str) -> Vec<String> {
    URL_IN_SCRIPT
        .find_iter(script)
        .map(|m| with_scheme(scheme, m.as_str()))
        .collect()
}

#[inline]
pub fn with_scheme(scheme: &str, url: &str) -> String {
    if url.starts_with("//") && !scheme.is_empty() {
        format!("{}:{}", scheme, url)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_script_urls() {
        let js = r#"var cdn = "//cdn.jsdelivr.net/npm/vue@3"; fetch('https://api.example.com/v1?x=1');"#;
        assert_eq!(
            extract_script_urls("https", js),
            vec!["https://cdn.jsdelivr.net/npm/vue@3", "https://api.example.com/v1?x=1"]
        );
    }

    #[test]
    fn test_plain_text_has_no_urls() {
        assert!(extract_script_urls("https", "var a = 1 // comment only").is_empty());
    }
}
