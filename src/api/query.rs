//! HTTP 查询接口
//!
//! `/api/v1` 下的五个端点：单个查询、批量查询、客户端自查、
//! 服务状态、健康检查。统一 `{ code, data }` 响应包装。
//!
//! 错误映射：Validation → 400，SourceUnavailable → 503，其余 → 500。
//! 格式错误的地址不算请求错误，正常 200 返回 `is_valid == false`
//! 的记录，由记录自身说明结果。

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};

use crate::errors::IpQueryError;
use crate::service::QueryService;
use crate::utils::extract_client_ip;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BatchQueryRequest {
    pub ips: Vec<String>,
}

pub struct QueryApiService;

impl QueryApiService {
    /// GET /api/v1/ip/{ip}
    pub async fn query_ip(
        path: web::Path<String>,
        service: web::Data<Arc<QueryService>>,
    ) -> impl Responder {
        let ip = path.into_inner();
        let ip = ip.trim();

        if ip.is_empty() {
            return error_response(&IpQueryError::validation("IP address must not be empty"));
        }

        debug!("HTTP query for {}", ip);
        match service.query_one(ip).await {
            Ok(location) => HttpResponse::Ok().json(ApiResponse {
                code: 0,
                data: location,
            }),
            Err(err) => {
                error!("query failed for {}: {}", ip, err);
                error_response(&err)
            }
        }
    }

    /// POST /api/v1/ip/batch
    pub async fn batch_query_ip(
        body: web::Json<BatchQueryRequest>,
        service: web::Data<Arc<QueryService>>,
    ) -> impl Responder {
        debug!("HTTP batch query for {} addresses", body.ips.len());

        match service.query_batch(&body.ips).await {
            Ok(locations) => HttpResponse::Ok().json(ApiResponse {
                code: 0,
                data: locations,
            }),
            Err(err) => {
                error!("batch query failed: {}", err);
                error_response(&err)
            }
        }
    }

    /// GET /api/v1/ip — 查询调用方自己的地址
    pub async fn query_client_ip(
        req: HttpRequest,
        service: web::Data<Arc<QueryService>>,
    ) -> impl Responder {
        let client_ip = match extract_client_ip(&req) {
            Some(ip) => ip,
            None => {
                return error_response(&IpQueryError::validation(
                    "unable to determine client IP",
                ));
            }
        };

        // peer_addr 可能带端口，只留地址部分
        let client_ip = client_ip
            .rsplit_once(':')
            .filter(|(host, port)| !host.contains(':') && port.parse::<u16>().is_ok())
            .map(|(host, _)| host.to_string())
            .unwrap_or(client_ip);

        info!("client IP query for {}", client_ip);
        match service.query_one(&client_ip).await {
            Ok(location) => HttpResponse::Ok().json(ApiResponse {
                code: 0,
                data: location,
            }),
            Err(err) => error_response(&err),
        }
    }

    /// GET /api/v1/status
    pub async fn get_status(service: web::Data<Arc<QueryService>>) -> impl Responder {
        HttpResponse::Ok().json(ApiResponse {
            code: 0,
            data: service.status(),
        })
    }

    /// GET /api/v1/health
    pub async fn health_check() -> impl Responder {
        HttpResponse::Ok().json(json!({
            "status": "ok",
            "time": chrono::Utc::now().timestamp(),
        }))
    }
}

/// 按错误分类映射 HTTP 状态码
fn error_response(err: &IpQueryError) -> HttpResponse {
    let body = json!({
        "code": err.code(),
        "message": err.message(),
    });
    match err {
        IpQueryError::Validation(_) => HttpResponse::BadRequest().json(body),
        IpQueryError::SourceUnavailable(_) => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// 注册 /api/v1 路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/ip", web::get().to(QueryApiService::query_client_ip))
            .route("/ip/batch", web::post().to(QueryApiService::batch_query_ip))
            .route("/ip/{ip}", web::get().to(QueryApiService::query_ip))
            .route("/status", web::get().to(QueryApiService::get_status))
            .route("/health", web::get().to(QueryApiService::health_check)),
    );
}
