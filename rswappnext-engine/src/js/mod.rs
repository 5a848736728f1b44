mod extractor;
mod splitter;

pub use extractor::{parse_value, JsGlobalExtractor};
pub use splitter::split_statements;
