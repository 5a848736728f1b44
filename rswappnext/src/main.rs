//! rswappnext 命令行入口
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};
use log::error;
use rswappnext::{
    ReportFormat, ReportWriter, RswResult, RswappError, ScanConfig, ScanType, TechDetector,
};

/// Wappalyzer 兼容的 Web 技术识别
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 单个 URL，或每行一个 URL 的文件
    #[arg(short, long)]
    input: String,

    /// fast / balanced / full
    #[arg(long, default_value = "balanced")]
    scan_type: ScanType,

    /// 同时扫描的 URL 数
    #[arg(short, long, default_value_t = 3)]
    threads: usize,

    /// 随每个请求发送的 Cookie 头
    #[arg(short, long)]
    cookie: Option<String>,

    /// technologies.json / categories.json / groups.json 所在目录
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[arg(long)]
    json_output: Option<PathBuf>,

    #[arg(long)]
    csv_output: Option<PathBuf>,

    #[arg(long)]
    html_output: Option<PathBuf>,
}

/// 无协议头时补 `http://`
fn normalize_url(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    }
}

fn read_targets(input: &str) -> RswResult<Vec<String>> {
    if !Path::new(input).is_file() {
        return Ok(vec![normalize_url(input.trim())]);
    }
    let content = std::fs::read_to_string(input)?;
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(normalize_url)
        .collect();
    if urls.is_empty() {
        return Err(RswappError::InvalidInput(format!("输入文件没有可扫描的 URL: {}", input)));
    }
    Ok(urls)
}

async fn run(cli: Cli) -> RswResult<()> {
    let targets = read_targets(&cli.input)?;

    let mut builder = ScanConfig::builder()
        .scan_type(cli.scan_type)
        .threads(cli.threads)
        .data_dir(&cli.data_dir);
    if let Some(cookie) = cli.cookie {
        builder = builder.cookie(cookie);
    }
    let detector = TechDetector::from_config(builder.build())?;

    let results = detector.scan_many(targets).await;

    if let Some(path) = &cli.json_output {
        ReportWriter::write(path, ReportFormat::Json, &results)?;
    }
    if let Some(path) = &cli.csv_output {
        ReportWriter::write(path, ReportFormat::Csv, &results)?;
    }
    if let Some(path) = &cli.html_output {
        ReportWriter::write(path, ReportFormat::Html, &results)?;
    }
    if cli.json_output.is_none() && cli.csv_output.is_none() && cli.html_output.is_none() {
        for (url, techs) in &results {
            println!("{}", ReportWriter::pretty_line(url, techs));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
