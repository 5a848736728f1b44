//! 在线扫描演示：需要 data/ 目录下的 technologies.json / categories.json / groups.json
//!
//! 运行命令：
//! cargo run --example scan_demo -- https://example.com https://www.rust-lang.org

use env_logger::{Builder, Env};
use rswappnext::{ReportWriter, ScanConfig, ScanType, TechDetector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        urls.push("https://example.com/".to_string());
    }

    let config = ScanConfig::builder()
        .scan_type(ScanType::Balanced)
        .threads(2)
        .data_dir("data")
        .build();
    let detector = TechDetector::from_config(config)?;

    let results = detector.scan_many(urls).await;
    for (url, techs) in &results {
        println!("{}", ReportWriter::pretty_line(url, techs));
    }
    print!("{}", ReportWriter::to_csv(&results));
    Ok(())
}
