//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 GeoLite2-City.mmdb 文件进行 IP 归属查询。
//! City 库不含 ISP 与区县字段，对应字段留空。

use std::net::IpAddr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use maxminddb::{geoip2, MaxMindDBError, Reader};
use tracing::trace;

use crate::errors::{IpQueryError, Result};
use crate::lookup::classifier::is_valid_ip;
use crate::lookup::provider::LookupProvider;
use crate::lookup::record::IpLocation;

/// MaxMind 查询后端
///
/// Reader 放在 ArcSwapOption 里，`close()` 置空即释放内存映射，
/// 之后的 `resolve` 统一返回 `SourceUnavailable`。
pub struct MaxMindProvider {
    reader: ArcSwapOption<Reader<Vec<u8>>>,
}

impl MaxMindProvider {
    /// 从文件路径创建 MaxMind 后端，文件不可读时直接失败
    pub fn new(path: &str) -> Result<Self> {
        let reader = Reader::open_readfile(path).map_err(|e| {
            IpQueryError::file_operation(format!(
                "failed to load MaxMind database at {}: {}",
                path, e
            ))
        })?;

        Ok(Self {
            reader: ArcSwapOption::from_pointee(reader),
        })
    }

    fn lookup_city(&self, reader: &Reader<Vec<u8>>, ip: &str, addr: IpAddr) -> IpLocation {
        let city: geoip2::City = match reader.lookup(addr) {
            Ok(city) => city,
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                return IpLocation::invalid(ip, "no data for this address");
            }
            Err(e) => {
                return IpLocation::invalid(ip, format!("lookup failed: {}", e));
            }
        };

        let country = city
            .country
            .as_ref()
            .and_then(|c| c.names.as_ref())
            .and_then(|names| names.get("en"))
            .map(|s| s.to_string())
            .unwrap_or_default();
        let country_code = city
            .country
            .as_ref()
            .and_then(|c| c.iso_code)
            .map(String::from)
            .unwrap_or_default();
        let region = city
            .subdivisions
            .as_ref()
            .and_then(|subs| subs.first())
            .and_then(|sub| sub.names.as_ref())
            .and_then(|names| names.get("en"))
            .map(|s| s.to_string())
            .unwrap_or_default();
        let city_name = city
            .city
            .as_ref()
            .and_then(|c| c.names.as_ref())
            .and_then(|names| names.get("en"))
            .map(|s| s.to_string())
            .unwrap_or_default();
        let (latitude, longitude, timezone) = city
            .location
            .as_ref()
            .map(|loc| {
                (
                    loc.latitude.unwrap_or(0.0),
                    loc.longitude.unwrap_or(0.0),
                    loc.time_zone.map(String::from).unwrap_or_default(),
                )
            })
            .unwrap_or((0.0, 0.0, String::new()));
        let postal_code = city
            .postal
            .as_ref()
            .and_then(|p| p.code)
            .map(String::from)
            .unwrap_or_default();

        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip,
            country,
            city_name
        );

        IpLocation {
            ip: ip.to_string(),
            country,
            country_code,
            region,
            city: city_name,
            district: String::new(), // City 库不提供区县
            isp: String::new(),      // City 库不提供 ISP
            latitude,
            longitude,
            timezone,
            postal_code,
            is_valid: true,
            error_message: String::new(),
        }
    }
}

#[async_trait]
impl LookupProvider for MaxMindProvider {
    async fn resolve(&self, ip: &str) -> Result<IpLocation> {
        let reader = self
            .reader
            .load_full()
            .ok_or_else(|| IpQueryError::source_unavailable("provider not initialized"))?;

        // 调用方已经校验过，这里再防御一次
        if !is_valid_ip(ip) {
            return Ok(IpLocation::invalid(ip, "invalid IP address format"));
        }

        let addr: IpAddr = match ip.trim().parse() {
            Ok(addr) => addr,
            Err(_) => return Ok(IpLocation::invalid(ip, "invalid IP address format")),
        };

        Ok(self.lookup_city(&reader, ip, addr))
    }

    async fn close(&self) {
        self.reader.store(None);
    }

    fn name(&self) -> &'static str {
        "maxmind"
    }
}
