//! 提取模块：从原始响应中提取检测所需信息
pub mod dom_snapshot;
pub mod header_converter;
pub mod html_extractor;
pub mod script_urls;

pub use self::dom_snapshot::DomSnapshot;
pub use self::header_converter::HeaderConverter;
pub use self::html_extractor::{HtmlExtractor, PageArtifacts};
pub use self::script_urls::extract_script_urls;
