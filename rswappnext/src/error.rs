//! 全局错误类型定义
use thiserror::Error;
use rswappnext_engine::CoreError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum RswappError {
    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),

    // 内核错误（规则解析 / 正则编译等）
    #[error("内核处理失败：{0}")]
    CoreError(#[from] CoreError),

    // 网络相关错误
    #[error("网络相关错误：{0}")]
    NetworkError(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效输入：{0}")]
    InvalidInput(String),

    #[error("异步任务执行失败：{0}")]
    AsyncTaskError(String),
}

// 全局Result类型
pub type RswResult<T> = Result<T, RswappError>;
