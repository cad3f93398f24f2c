use serde::{Deserialize, Serialize};

/// IP 地理位置记录
///
/// 一次查询的完整结果，构造后不再修改。缓存与两个前端
/// （HTTP / RPC）传递的都是这个结构。
///
/// 约定：`is_valid == false` 时所有地理字段为空、经纬度为 0，
/// `error_message` 非空；`is_valid == true` 时 `error_message` 为空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpLocation {
    /// 查询的 IP 地址，原样返回
    pub ip: String,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub city: String,
    /// 区县，数据源不提供时为空
    pub district: String,
    pub isp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub postal_code: String,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_message: String,
}

impl IpLocation {
    /// 构造一条查询失败记录，地理字段全部置空
    pub fn invalid<I: Into<String>, M: Into<String>>(ip: I, message: M) -> Self {
        Self {
            ip: ip.into(),
            country: String::new(),
            country_code: String::new(),
            region: String::new(),
            city: String::new(),
            district: String::new(),
            isp: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: String::new(),
            postal_code: String::new(),
            is_valid: false,
            error_message: message.into(),
        }
    }

    /// 保留地址（内网/回环/链路本地）的固定记录
    pub fn local_network<I: Into<String>>(ip: I) -> Self {
        Self {
            ip: ip.into(),
            country: "local network".to_string(),
            country_code: "LAN".to_string(),
            region: "local network".to_string(),
            city: "local network".to_string(),
            district: String::new(),
            isp: "local network".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: "UTC".to_string(),
            postal_code: "000000".to_string(),
            is_valid: true,
            error_message: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_shape() {
        let record = IpLocation::invalid("not-an-ip", "invalid IP address format");
        assert!(!record.is_valid);
        assert_eq!(record.ip, "not-an-ip");
        assert!(!record.error_message.is_empty());
        assert!(record.country.is_empty());
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.longitude, 0.0);
    }

    #[test]
    fn test_local_network_record_shape() {
        let record = IpLocation::local_network("192.168.1.1");
        assert!(record.is_valid);
        assert_eq!(record.country_code, "LAN");
        assert_eq!(record.timezone, "UTC");
        assert_eq!(record.postal_code, "000000");
        assert!(record.error_message.is_empty());
    }

    #[test]
    fn test_error_message_skipped_when_empty() {
        let record = IpLocation::local_network("10.0.0.1");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("error_message"));

        let record = IpLocation::invalid("x", "bad");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("error_message"));
    }
}
