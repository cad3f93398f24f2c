//! HTTP API integration tests

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test as actix_test, web, App};
use serde_json::Value;

use ipquery::api::configure_routes;
use ipquery::lookup::{LookupProvider, MockProvider};
use ipquery::service::{QueryService, ServiceCounters};

fn build_service() -> Arc<QueryService> {
    let provider: Arc<dyn LookupProvider> = Arc::new(MockProvider::new());
    Arc::new(QueryService::new(
        provider,
        Some(Duration::from_secs(60)),
        ServiceCounters::new(),
    ))
}

macro_rules! init_app {
    ($service:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($service.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_query_ip_success() {
    let service = build_service();
    let app = init_app!(service);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/ip/8.8.8.8")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["ip"], "8.8.8.8");
    assert_eq!(body["data"]["is_valid"], true);
}

#[actix_web::test]
async fn test_query_malformed_ip_returns_invalid_record() {
    let service = build_service();
    let app = init_app!(service);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/ip/not-an-ip")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    // 格式错误不是请求错误：200 + is_valid=false 的记录
    assert!(resp.status().is_success());
    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["data"]["is_valid"], false);
    assert!(body["data"]["error_message"].as_str().unwrap().len() > 0);
}

#[actix_web::test]
async fn test_query_reserved_ip_returns_lan_record() {
    let service = build_service();
    let app = init_app!(service);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/ip/192.168.1.1")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["data"]["country_code"], "LAN");
    assert_eq!(body["data"]["country"], "local network");
}

#[actix_web::test]
async fn test_batch_query_positional_results() {
    let service = build_service();
    let app = init_app!(service);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/ip/batch")
        .set_json(serde_json::json!({
            "ips": ["not-an-ip", "192.168.0.1", "8.8.8.8"]
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = actix_test::read_body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["is_valid"], false);
    assert_eq!(data[1]["country_code"], "LAN");
    assert_eq!(data[2]["is_valid"], true);
}

#[actix_web::test]
async fn test_batch_query_empty_is_bad_request() {
    let service = build_service();
    let app = init_app!(service);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/ip/batch")
        .set_json(serde_json::json!({ "ips": [] }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["code"], "E001");
}

#[actix_web::test]
async fn test_batch_query_oversized_is_bad_request() {
    let service = build_service();
    let app = init_app!(service);

    let ips: Vec<String> = (0..101).map(|i| format!("1.2.3.{}", i % 256)).collect();
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/ip/batch")
        .set_json(serde_json::json!({ "ips": ips }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_client_ip_honors_forwarded_header() {
    let service = build_service();
    let app = init_app!(service);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/ip")
        .insert_header(("x-forwarded-for", "8.8.8.8, 10.0.0.1"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["data"]["ip"], "8.8.8.8");
    assert_eq!(body["data"]["is_valid"], true);
}

#[actix_web::test]
async fn test_status_endpoint() {
    let service = build_service();
    let app = init_app!(service);

    // 先打一发查询，确认计数会反映出来
    let req = actix_test::TestRequest::get()
        .uri("/api/v1/ip/8.8.8.8")
        .to_request();
    actix_test::call_service(&app, req).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/status")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "running");
    assert_eq!(body["data"]["query_count"], 1);
    assert!(body["data"]["version"].as_str().unwrap().len() > 0);
}

#[actix_web::test]
async fn test_health_endpoint() {
    let service = build_service();
    let app = init_app!(service);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/health")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["time"].as_i64().unwrap() > 0);
}

#[actix_web::test]
async fn test_closed_provider_yields_service_unavailable() {
    let service = build_service();
    service.shutdown().await;
    let app = init_app!(service);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/ip/8.8.8.8")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["code"], "E002");
}
