use std::fs;
use std::path::Path;

use log::{debug, info};
use rswappnext_engine::{SignatureDb, WappalyzerParser};

use crate::config::DataPaths;
use crate::error::{RswResult, RswappError};

/// 技术库加载器：读取本地三件套并解析为只读签名库
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleLoader;

impl RuleLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, paths: &DataPaths) -> RswResult<SignatureDb> {
        let technologies = Self::read(&paths.technologies)?;
        let categories = Self::read(&paths.categories)?;
        let groups = Self::read(&paths.groups)?;
        self.load_from_strs(&technologies, &categories, &groups)
    }

    /// 直接从内存中的 JSON 文本构建
    pub fn load_from_strs(
        &self,
        technologies: &str,
        categories: &str,
        groups: &str,
    ) -> RswResult<SignatureDb> {
        let db = WappalyzerParser::parse_database(technologies, categories, groups)?;
        info!(
            "Rule library loaded | techs: {} | categories: {} | groups: {}",
            db.len(),
            db.category_count(),
            db.group_count()
        );
        Ok(db)
    }

    fn read(path: &Path) -> RswResult<String> {
        debug!("Reading rule file: {}", path.display());
        fs::read_to_string(path).map_err(|e| {
            RswappError::RuleLoadError(format!("读取规则文件[{}]失败: {}", path.display(), e))
        })
    }
}
