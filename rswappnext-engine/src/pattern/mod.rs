mod compiler;
mod dict;
mod matcher;
mod regex_repair;
mod version;

pub use compiler::{CompiledRule, PatternCompiler};
pub use dict::DictMatcher;
pub use matcher::RuleMatcher;
pub use regex_repair::{build_regex, repair_escape};
pub use version::VersionTemplate;
