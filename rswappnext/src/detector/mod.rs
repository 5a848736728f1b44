//! 检测模块：技术检测核心逻辑
pub mod detector;

// 导出核心接口
pub use self::detector::{ScanResults, TechDetector};
