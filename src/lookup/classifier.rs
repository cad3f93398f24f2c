//! IP 地址分类
//!
//! 纯函数：语法校验、保留地址段判断。不持有任何状态，
//! 任意并发调用无需同步，也永远不会 panic。

use std::net::IpAddr;

/// 检查字符串是否为合法的 IPv4/IPv6 地址
///
/// 接受点分十进制 IPv4 和冒分十六进制 IPv6（含压缩形式），
/// 空串和非地址文本返回 false。
pub fn is_valid_ip(ip: &str) -> bool {
    ip.trim().parse::<IpAddr>().is_ok()
}

/// 检查地址是否落在保留/私有地址段内
///
/// IPv4: 10/8, 172.16/12, 192.168/16, 127/8, 169.254/16
/// IPv6: fc00::/7, fe80::/10, ::1/128
///
/// 无法解析的输入返回 false，不报错。
pub fn is_reserved_ip(ip: &str) -> bool {
    let addr = match ip.trim().parse::<IpAddr>() {
        Ok(addr) => addr,
        Err(_) => return false,
    };

    match addr {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7 (ULA)
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10 (link-local)
        }
    }
}

/// 合法且可路由（非保留段）
pub fn is_routable_ip(ip: &str) -> bool {
    is_valid_ip(ip) && !is_reserved_ip(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ip_v4() {
        assert!(is_valid_ip("8.8.8.8"));
        assert!(is_valid_ip("255.255.255.255"));
        assert!(is_valid_ip(" 1.1.1.1 "));
        assert!(!is_valid_ip(""));
        assert!(!is_valid_ip("256.1.1.1"));
        assert!(!is_valid_ip("1.2.3"));
        assert!(!is_valid_ip("not-an-ip"));
        assert!(!is_valid_ip("8.8.8.8:80"));
    }

    #[test]
    fn test_is_valid_ip_v6() {
        assert!(is_valid_ip("::1"));
        assert!(is_valid_ip("fe80::1"));
        assert!(is_valid_ip("2001:4860:4860::8888"));
        assert!(is_valid_ip("2001:0db8:0000:0000:0000:0000:0000:0001"));
        assert!(!is_valid_ip("2001:db8::g"));
        assert!(!is_valid_ip(":::"));
    }

    #[test]
    fn test_is_reserved_ip_v4() {
        assert!(is_reserved_ip("10.0.0.1"));
        assert!(is_reserved_ip("172.16.0.1"));
        assert!(is_reserved_ip("172.31.255.254"));
        assert!(is_reserved_ip("192.168.1.1"));
        assert!(is_reserved_ip("127.0.0.1"));
        assert!(is_reserved_ip("169.254.0.1"));
        assert!(!is_reserved_ip("172.32.0.1"));
        assert!(!is_reserved_ip("8.8.8.8"));
        assert!(!is_reserved_ip("1.1.1.1"));
    }

    #[test]
    fn test_is_reserved_ip_v6() {
        assert!(is_reserved_ip("::1"));
        assert!(is_reserved_ip("fc00::1"));
        assert!(is_reserved_ip("fd12:3456::1"));
        assert!(is_reserved_ip("fe80::1"));
        assert!(!is_reserved_ip("2001:4860:4860::8888"));
    }

    #[test]
    fn test_is_reserved_ip_invalid_input() {
        assert!(!is_reserved_ip(""));
        assert!(!is_reserved_ip("garbage"));
    }

    #[test]
    fn test_is_routable_ip() {
        assert!(is_routable_ip("8.8.8.8"));
        assert!(is_routable_ip("2001:4860:4860::8888"));
        assert!(!is_routable_ip("192.168.1.1"));
        assert!(!is_routable_ip("fe80::1"));
        assert!(!is_routable_ip("not-an-ip"));
    }
}
