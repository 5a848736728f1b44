//! Header格式转换工具
use http::header::HeaderMap;
use log::warn;
use rswappnext_engine::EvidenceMap;

const MAX_HEADER_ITER: usize = 1000;

/// Header转换工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 响应头 → 大小写不敏感的 headers 证据（同名头保留全部值）
    pub fn to_evidence(headers: &HeaderMap) -> EvidenceMap {
        let mut map = EvidenceMap::case_insensitive();
        for (i, (key, value)) in headers.iter().enumerate() {
            if i >= MAX_HEADER_ITER {
                warn!("Header iteration exceeded {}, truncated", MAX_HEADER_ITER);
                break;
            }
            map.insert(key.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        map
    }

    /// 双返回值：headers 证据 + cookies 证据
    pub fn convert_all(headers: &HeaderMap) -> (EvidenceMap, EvidenceMap) {
        let header_map = Self::to_evidence(headers);
        let mut cookies = EvidenceMap::new();

        for raw in headers.get_all(http::header::SET_COOKIE) {
            if let Ok(raw) = raw.to_str() {
                Self::parse_set_cookie(raw, &mut cookies);
            }
        }
        for raw in headers.get_all(http::header::COOKIE) {
            if let Ok(raw) = raw.to_str() {
                Self::parse_request_cookie(raw, &mut cookies);
            }
        }

        (header_map, cookies)
    }

    // Set-Cookie 只取第一段 name=value，属性忽略
    fn parse_set_cookie(raw_cookie: &str, cookies: &mut EvidenceMap) {
        let Some(core_kv) = raw_cookie.split(';').map(str::trim).find(|s| !s.is_empty()) else {
            return;
        };
        Self::push_pair(core_kv, cookies);
    }

    fn parse_request_cookie(raw_cookie: &str, cookies: &mut EvidenceMap) {
        for core_kv in raw_cookie.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            Self::push_pair(core_kv, cookies);
        }
    }

    // Cookie名不能为空；值为 deleted 的是注销 Cookie，丢弃
    fn push_pair(core_kv: &str, cookies: &mut EvidenceMap) {
        let Some((name, value)) = core_kv.split_once('=') else {
            return;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.eq_ignore_ascii_case("deleted") {
            return;
        }
        cookies.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, SET_COOKIE};

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("nginx/1.25.3"));
        headers.insert("x-powered-by", HeaderValue::from_static("PHP/8.2.1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("PHPSESSID=abc123; path=/; HttpOnly"));
        headers.append(SET_COOKIE, HeaderValue::from_static("wp_lang=deleted; expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        headers.append(SET_COOKIE, HeaderValue::from_static("_ga=GA1.2.3"));
        headers
    }

    #[test]
    fn test_headers_case_insensitive() {
        let (header_map, _) = HeaderConverter::convert_all(&headers());
        assert_eq!(header_map.get("Server"), Some(&["nginx/1.25.3".to_string()][..]));
        assert_eq!(header_map.get("set-cookie").map(|v| v.len()), Some(3));
    }

    #[test]
    fn test_set_cookie_parsing_keeps_name_case() {
        let (_, cookies) = HeaderConverter::convert_all(&headers());
        assert_eq!(cookies.get("PHPSESSID"), Some(&["abc123".to_string()][..]));
        assert!(cookies.get("phpsessid").is_none());
        assert!(!cookies.contains_key("wp_lang"));
        assert!(cookies.contains_key("_ga"));
    }

    #[test]
    fn test_request_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, HeaderValue::from_static("a=1; b = 2 ;broken; =x"));
        let (_, cookies) = HeaderConverter::convert_all(&headers);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get("b"), Some(&["2".to_string()][..]));
    }
}
