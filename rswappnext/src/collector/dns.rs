//! DNS 记录采集
use std::net::IpAddr;

use futures::future::join_all;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioResolver;
use log::debug;
use rswappnext_engine::EvidenceMap;

use crate::error::{RswResult, RswappError};

pub const RECORD_TYPES: [RecordType; 5] = [
    RecordType::MX,
    RecordType::NS,
    RecordType::TXT,
    RecordType::SOA,
    RecordType::CNAME,
];

pub struct DnsLookup {
    resolver: TokioResolver,
}

impl DnsLookup {
    pub fn new() -> RswResult<Self> {
        let resolver = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|e| RswappError::NetworkError(format!("DNS 解析器创建失败: {}", e)))?
            .build();
        Ok(Self { resolver })
    }

    /// 五类记录并行查询；单类查询失败记为空列表
    pub async fn lookup(&self, domain: &str) -> EvidenceMap {
        let lookups = RECORD_TYPES.iter().map(|record_type| self.query(domain, *record_type));
        let results = join_all(lookups).await;

        let mut records = EvidenceMap::case_insensitive();
        for (record_type, values) in RECORD_TYPES.iter().zip(results) {
            records.insert_all(&record_type.to_string(), values);
        }
        records
    }

    async fn query(&self, domain: &str, record_type: RecordType) -> Vec<String> {
        match self.resolver.lookup(domain, record_type).await {
            Ok(response) => response.iter().map(|rdata| rdata.to_string()).collect(),
            Err(e) => {
                debug!("DNS {} lookup for {} failed: {}", record_type, domain, e);
                Vec::new()
            }
        }
    }
}

/// 按公共后缀列表取可注册域名（`shop.example.co.uk` → `example.co.uk`）
/// IP 地址、本身就是公共后缀或后缀未知的主机名原样返回
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host.parse::<IpAddr>().is_ok() {
        return host;
    }
    psl::domain_str(&host).map(str::to_string).unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain("a.b.Example.COM."), "example.com");
        assert_eq!(registrable_domain("shop.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("example.de"), "example.de");
        assert_eq!(registrable_domain("shop.example.gob.mx"), "example.gob.mx");
        assert_eq!(registrable_domain("www.district.k12.ca.us"), "district.k12.ca.us");
        assert_eq!(registrable_domain("gob.mx"), "gob.mx");
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain("192.168.1.10"), "192.168.1.10");
    }

    #[test]
    fn test_record_type_keys() {
        let keys: Vec<String> = RECORD_TYPES.iter().map(|r| r.to_string()).collect();
        assert_eq!(keys, vec!["MX", "NS", "TXT", "SOA", "CNAME"]);
    }
}
