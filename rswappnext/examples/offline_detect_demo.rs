//! 离线检测演示：内置小型技术库 + 固定响应，无网络
//!
//! 运行命令：
//! cargo run --example offline_detect_demo

use std::sync::Arc;
use std::time::Instant;

use env_logger::{Builder, Env};
use http::header::{HeaderMap, HeaderValue, SERVER, SET_COOKIE};
use rswappnext::{ReportWriter, RuleLoader, ScanConfig, ScanResults, ScanType, TechDetector};

const TECHNOLOGIES: &str = r#"{
    "Nginx": { "cats": [22], "headers": { "Server": "nginx(?:/([\\d.]+))?\\;version:\\1" } },
    "PHP": { "cats": [27], "cookies": { "PHPSESSID": "" } },
    "WordPress": {
        "cats": [1],
        "meta": { "generator": "^WordPress ?([\\d.]+)?\\;version:\\1" },
        "implies": ["PHP", "MySQL"]
    },
    "jQuery": {
        "cats": [59],
        "scriptSrc": "jquery-(\\d+\\.\\d+\\.\\d+)(?:\\.min)?\\.js\\;version:\\1",
        "js": { "jQuery.fn.jquery": "([\\d.]+)\\;version:\\1" }
    },
    "MySQL": { "cats": [34] }
}"#;

const CATEGORIES: &str = r#"{
    "1": { "name": "CMS", "groups": [3] },
    "22": { "name": "Web servers", "groups": [7] },
    "27": { "name": "Programming languages", "groups": [9] },
    "34": { "name": "Databases", "groups": [7] },
    "59": { "name": "JavaScript libraries", "groups": [9] }
}"#;

const GROUPS: &str = r#"{
    "3": { "name": "Content" },
    "7": { "name": "Servers" },
    "9": { "name": "Web development" }
}"#;

const PAGE: &str = r#"<!doctype html>
<html>
<head>
    <meta name="generator" content="WordPress 6.4.2">
    <script src="/wp-includes/js/jquery/jquery-3.7.1.min.js"></script>
</head>
<body><h1>Hello</h1></body>
</html>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let db = RuleLoader::new().load_from_strs(TECHNOLOGIES, CATEGORIES, GROUPS)?;
    let config = ScanConfig::builder().scan_type(ScanType::Fast).build();
    let detector = TechDetector::new(Arc::new(db), config);

    let mut headers = HeaderMap::new();
    headers.insert(SERVER, HeaderValue::from_static("nginx/1.24.0"));
    headers.insert(SET_COOKIE, HeaderValue::from_static("PHPSESSID=abc123; path=/"));

    let url = "https://blog.example.com/";
    let start = Instant::now();
    let result = detector.detect(url, &headers, PAGE);
    println!("检测耗时: {:.3} ms", start.elapsed().as_secs_f64() * 1000.0);

    println!("{}", ReportWriter::pretty_line(url, &result));

    let mut results = ScanResults::new();
    results.insert(url.to_string(), result);
    println!("{}", ReportWriter::to_json(&results)?);
    Ok(())
}
