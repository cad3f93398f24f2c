//! 客户端 IP 提取
//!
//! `/api/v1/ip` 查询调用方自身地址时使用。优先级：
//! X-Forwarded-For（取第一个）→ X-Real-IP → 连接对端地址。

use actix_web::HttpRequest;

/// 从请求头提取转发的 IP（X-Forwarded-For 或 X-Real-IP）
pub fn extract_forwarded_ip_from_headers(
    headers: &actix_web::http::header::HeaderMap,
) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// 提取真实客户端 IP
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_forwarded_ip_from_headers(req.headers()).or_else(|| {
        req.connection_info()
            .peer_addr()
            .map(|addr| addr.to_string())
    })
}
