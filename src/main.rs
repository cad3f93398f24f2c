use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use tracing::{error, info};

use ipquery::api;
use ipquery::config::{get_config, init_config};
use ipquery::lookup::{LookupProvider, MaxMindProvider, MockProvider};
use ipquery::rpc::start_rpc_server;
use ipquery::service::{QueryService, ServiceCounters};
use ipquery::system::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    init_config();
    let config = get_config();

    // guard 必须活到进程结束，否则缓冲日志会丢
    let _log_guard = init_logging(&config.logging);

    info!("Starting ipquery v{}", env!("CARGO_PKG_VERSION"));

    // 选择查询后端；maxmind 数据库打不开属于致命错误
    let provider: Arc<dyn LookupProvider> = match config.database.provider.as_str() {
        "maxmind" => match MaxMindProvider::new(&config.database.path) {
            Ok(provider) => {
                info!("Using MaxMind database at {}", config.database.path);
                Arc::new(provider)
            }
            Err(e) => {
                error!("Failed to initialize lookup provider: {}", e);
                std::process::exit(1);
            }
        },
        "mock" => {
            info!("Using mock provider (no database configured)");
            Arc::new(MockProvider::new())
        }
        other => {
            error!("Unknown database provider: {}", other);
            std::process::exit(1);
        }
    };

    let cache_ttl = if config.cache.enabled {
        Some(Duration::from_secs(config.cache.default_ttl))
    } else {
        None
    };

    let service = Arc::new(QueryService::new(
        provider,
        cache_ttl,
        ServiceCounters::new(),
    ));

    // RPC 服务器与 HTTP 服务器并行运行，共用同一个 QueryService
    if config.rpc.enabled {
        let rpc_addr = format!("{}:{}", config.rpc.host, config.rpc.port);
        if let Err(e) = start_rpc_server(&rpc_addr, service.clone()).await {
            error!("Failed to start RPC server: {}", e);
            std::process::exit(1);
        }
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server at http://{}", bind_address);

    let http_service = service.clone();
    let result = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(http_service.clone()))
            .configure(api::configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await;

    info!("Shutting down...");
    service.shutdown().await;

    result
}
