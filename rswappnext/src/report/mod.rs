//! 结果输出：JSON / CSV / HTML / 单行摘要
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use rswappnext_engine::EnrichedResult;

use crate::detector::ScanResults;
use crate::error::{RswResult, RswappError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
    Html,
}

impl FromStr for ReportFormat {
    type Err = RswappError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "html" => Ok(ReportFormat::Html),
            other => Err(RswappError::InvalidInput(format!("不支持的输出格式: {}", other))),
        }
    }
}

pub struct ReportWriter;

impl ReportWriter {
    /// `{url: {tech: {version, confidence, categories, groups}}}`
    pub fn to_json(results: &ScanResults) -> RswResult<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }

    /// 每行 `url,tech,version,confidence,categories,groups`，列表字段以空格连接
    pub fn to_csv(results: &ScanResults) -> String {
        let mut out = String::new();
        for (url, techs) in results {
            for (name, entry) in techs {
                let _ = writeln!(
                    out,
                    "{},{},{},{},{},{}",
                    url,
                    name,
                    entry.version,
                    entry.confidence,
                    entry.categories.join(" "),
                    entry.groups.join(" ")
                );
            }
        }
        out
    }

    /// 单页 HTML 报告：每个 URL 一个区块，顶部输入框按技术名过滤
    pub fn to_html(results: &ScanResults) -> String {
        let mut out = String::from(HTML_HEAD);
        for (url, techs) in results {
            let _ = writeln!(
                out,
                r#"<div class="site" data-techs="{}">"#,
                escape_html(&techs.keys().map(|t| t.to_lowercase()).collect::<Vec<_>>().join(" "))
            );
            let _ = writeln!(out, r#"  <div class="site-url">{}</div>"#, escape_html(url));
            out.push_str("  <div class=\"tech-grid\">\n");
            for (name, entry) in techs {
                let version = if entry.version.is_empty() {
                    String::new()
                } else {
                    format!(" v{}", entry.version)
                };
                let _ = writeln!(
                    out,
                    r#"    <div class="tech-item"><div class="tech-name">{}{}</div><div class="tech-meta">{} | {}</div></div>"#,
                    escape_html(name),
                    escape_html(&version),
                    escape_html(&entry.categories.join(", ")),
                    escape_html(&entry.groups.join(", "))
                );
            }
            out.push_str("  </div>\n</div>\n");
        }
        out.push_str(HTML_TAIL);
        out
    }

    /// `url Tech v1.2, Other`
    pub fn pretty_line(url: &str, result: &EnrichedResult) -> String {
        let techs: Vec<String> = result
            .iter()
            .map(|(name, entry)| {
                if entry.version.is_empty() {
                    name.clone()
                } else {
                    format!("{} v{}", name, entry.version)
                }
            })
            .collect();

        if techs.is_empty() {
            url.to_string()
        } else {
            format!("{} {}", url, techs.join(", "))
        }
    }

    pub fn write(path: impl AsRef<Path>, format: ReportFormat, results: &ScanResults) -> RswResult<()> {
        let content = match format {
            ReportFormat::Json => Self::to_json(results)?,
            ReportFormat::Csv => Self::to_csv(results),
            ReportFormat::Html => Self::to_html(results),
        };
        fs::write(path.as_ref(), content)?;
        log::info!("Report written: {}", path.as_ref().display());
        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>rswappnext results</title>
<style>
body { font-family: Arial, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; }
.search-box { padding: 8px; width: 100%; border: 1px solid #ccc; border-radius: 4px; margin-bottom: 20px; }
.site { margin-bottom: 20px; padding: 15px; border: 1px solid #ddd; border-radius: 4px; }
.site-url { font-size: 1.1em; font-weight: bold; margin-bottom: 10px; word-break: break-all; }
.tech-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(250px, 1fr)); gap: 10px; }
.tech-item { padding: 8px; background: #f5f5f5; border-radius: 4px; }
.tech-meta { font-size: 0.85em; color: #666; }
</style>
</head>
<body>
<input id="search" class="search-box" type="text" placeholder="Filter by technology...">
<div id="results">
"#;

const HTML_TAIL: &str = r#"</div>
<script>
document.getElementById('search').addEventListener('input', function (e) {
    const term = e.target.value.trim().toLowerCase();
    document.querySelectorAll('.site').forEach(function (site) {
        const techs = site.getAttribute('data-techs');
        site.style.display = !term || techs.includes(term) ? '' : 'none';
    });
});
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rswappnext_engine::EnrichedEntry;

    fn results() -> ScanResults {
        let mut techs = EnrichedResult::new();
        techs.insert(
            "Nginx".into(),
            EnrichedEntry {
                version: "1.24.0".into(),
                confidence: 100,
                categories: vec!["Web servers".into(), "Reverse proxies".into()],
                groups: vec!["Servers".into()],
            },
        );
        techs.insert(
            "PHP".into(),
            EnrichedEntry {
                version: String::new(),
                confidence: 100,
                categories: vec!["Programming languages".into()],
                groups: vec!["Web development".into()],
            },
        );
        let mut results = ScanResults::new();
        results.insert("https://a.example/".into(), techs);
        results.insert("https://b.example/".into(), EnrichedResult::new());
        results
    }

    #[test]
    fn test_csv_rows() {
        let csv = ReportWriter::to_csv(&results());
        assert_eq!(
            csv,
            "https://a.example/,Nginx,1.24.0,100,Web servers Reverse proxies,Servers\n\
             https://a.example/,PHP,,100,Programming languages,Web development\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = ReportWriter::to_json(&results()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["https://a.example/"]["Nginx"]["version"], "1.24.0");
        assert_eq!(value["https://a.example/"]["PHP"]["groups"][0], "Web development");
        assert!(value["https://b.example/"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_pretty_line() {
        let results = results();
        assert_eq!(
            ReportWriter::pretty_line("https://a.example/", &results["https://a.example/"]),
            "https://a.example/ Nginx v1.24.0, PHP"
        );
        assert_eq!(
            ReportWriter::pretty_line("https://b.example/", &results["https://b.example/"]),
            "https://b.example/"
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("html".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_html_lists_every_site() {
        let html = ReportWriter::to_html(&results());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="site" data-techs="nginx php">"#));
        assert!(html.contains(r#"<div class="site-url">https://b.example/</div>"#));
        assert!(html.contains(
            r#"<div class="tech-name">Nginx v1.24.0</div><div class="tech-meta">Web servers, Reverse proxies | Servers</div>"#
        ));
        assert!(html.contains(r#"<div class="tech-name">PHP</div>"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_html_escapes_markup() {
        let mut techs = EnrichedResult::new();
        techs.insert("<Tag>".into(), EnrichedEntry::default());
        let mut results = ScanResults::new();
        results.insert(r#"https://x.example/?q="a"&b"#.into(), techs);

        let html = ReportWriter::to_html(&results);
        assert!(html.contains("https://x.example/?q=&quot;a&quot;&amp;b"));
        assert!(html.contains("&lt;Tag&gt;"));
        assert!(!html.contains("<Tag>"));
    }

    #[test]
    fn test_write_html_file() {
        let path = std::env::temp_dir().join(format!("rswappnext-report-{}.html", std::process::id()));
        ReportWriter::write(&path, ReportFormat::Html, &results()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Nginx v1.24.0"));
        let _ = std::fs::remove_file(&path);
    }
}
