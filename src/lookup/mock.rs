//! 模拟查询后端
//!
//! 不依赖任何数据库文件，从固定表里随机生成归属信息。
//! 用于测试和离线运行。

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rand::Rng;

use crate::errors::{IpQueryError, Result};
use crate::lookup::classifier::is_valid_ip;
use crate::lookup::provider::LookupProvider;
use crate::lookup::record::IpLocation;

const COUNTRIES: &[(&str, &str)] = &[
    ("China", "CN"),
    ("United States", "US"),
    ("Japan", "JP"),
    ("South Korea", "KR"),
    ("Germany", "DE"),
    ("United Kingdom", "GB"),
    ("France", "FR"),
    ("Canada", "CA"),
];

const REGIONS: &[&str] = &[
    "Beijing", "Shanghai", "Guangdong", "Jiangsu", "Zhejiang", "Sichuan", "Hubei", "Henan",
];

const CITIES: &[&str] = &[
    "Beijing", "Shanghai", "Guangzhou", "Shenzhen", "Hangzhou", "Nanjing", "Chengdu", "Wuhan",
];

const ISPS: &[&str] = &[
    "China Telecom",
    "China Unicom",
    "China Mobile",
    "Comcast",
    "Deutsche Telekom",
];

/// 随机数据查询后端
pub struct MockProvider {
    initialized: AtomicBool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            initialized: AtomicBool::new(true),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupProvider for MockProvider {
    async fn resolve(&self, ip: &str) -> Result<IpLocation> {
        if !self.initialized.load(Ordering::Acquire) {
            return Err(IpQueryError::source_unavailable("provider not initialized"));
        }

        if !is_valid_ip(ip) {
            return Ok(IpLocation::invalid(ip, "invalid IP address format"));
        }

        let mut rng = rand::thread_rng();
        let (country, country_code) = COUNTRIES[rng.gen_range(0..COUNTRIES.len())];
        let city = CITIES[rng.gen_range(0..CITIES.len())];

        Ok(IpLocation {
            ip: ip.to_string(),
            country: country.to_string(),
            country_code: country_code.to_string(),
            region: REGIONS[rng.gen_range(0..REGIONS.len())].to_string(),
            city: city.to_string(),
            district: format!("{} District", CITIES[rng.gen_range(0..CITIES.len())]),
            isp: ISPS[rng.gen_range(0..ISPS.len())].to_string(),
            latitude: 30.0 + rng.gen_range(0.0..20.0),
            longitude: 100.0 + rng.gen_range(0.0..20.0),
            timezone: "Asia/Shanghai".to_string(),
            postal_code: format!("{:06}", rng.gen_range(100000..1000000)),
            is_valid: true,
            error_message: String::new(),
        })
    }

    async fn close(&self) {
        self.initialized.store(false, Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_valid_ip() {
        let provider = MockProvider::new();
        let record = provider.resolve("8.8.8.8").await.unwrap();
        assert!(record.is_valid);
        assert_eq!(record.ip, "8.8.8.8");
        assert!(!record.country.is_empty());
        assert!(!record.country_code.is_empty());
        assert!(record.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_invalid_ip_defensive() {
        let provider = MockProvider::new();
        let record = provider.resolve("not-an-ip").await.unwrap();
        assert!(!record.is_valid);
        assert!(!record.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let provider = MockProvider::new();
        provider.close().await;
        provider.close().await;

        let err = provider.resolve("8.8.8.8").await.err().unwrap();
        assert_eq!(err.code(), "E002");
    }

    #[tokio::test]
    async fn test_resolve_batch_isolates_failures() {
        let provider = MockProvider::new();
        let ips = vec!["8.8.8.8".to_string(), "bogus".to_string()];
        let results = provider.resolve_batch(&ips).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_valid);
        assert!(!results[1].is_valid);
    }
}
