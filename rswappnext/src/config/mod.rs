pub mod scan;

pub use scan::{DataPaths, ScanConfig, ScanConfigBuilder, ScanType, DEFAULT_USER_AGENT};
