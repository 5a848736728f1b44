//! rswappnext-engine 内核错误定义
//! 封装内核层所有错误，与业务层错误解耦，基于thiserror实现类型安全处理
use thiserror::Error;

use serde_json::Error as SerdeJsonError;

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 规则相关错误 =====================
    /// 规则加载失败（规则文件结构不可识别）
    #[error("Rule load failed: {0}")]
    RuleLoadError(String),

    /// 模式指令错误（例如 `\;confidence:` 后缺少数字）
    #[error("Malformed pattern directive: {0}")]
    PatternError(String),

    // ===================== 内核基础错误 =====================
    /// JSON 解析失败
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] SerdeJsonError),
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
