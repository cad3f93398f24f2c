//! 查询编排服务
//!
//! 位于协议前端和查询后端之间的核心层：校验 → 缓存 → 保留段
//! 短路 → 数据源，并维护服务级计数。HTTP 和 RPC 前端共用同一个
//! 实例。

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::ExpiringCache;
use crate::errors::{IpQueryError, Result};
use crate::lookup::{is_reserved_ip, is_valid_ip, IpLocation, LookupProvider};
use crate::service::counters::ServiceCounters;

/// 单次批量查询的地址数上限
pub const MAX_BATCH_SIZE: usize = 100;

/// 服务状态快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub query_count: u64,
    pub cache_size: usize,
}

/// 查询编排服务
///
/// 独占持有缓存和查询后端，二者随 `shutdown()` 一起释放。
pub struct QueryService {
    provider: Arc<dyn LookupProvider>,
    cache: Option<Arc<ExpiringCache>>,
    counters: ServiceCounters,
}

impl QueryService {
    /// 创建服务。`cache_ttl` 为 None 时关闭缓存。
    ///
    /// 必须在 tokio runtime 内调用（缓存会启动后台清理任务）。
    pub fn new(
        provider: Arc<dyn LookupProvider>,
        cache_ttl: Option<Duration>,
        counters: ServiceCounters,
    ) -> Self {
        let cache = cache_ttl.map(ExpiringCache::new);
        if cache.is_none() {
            info!("query cache disabled");
        }
        info!("QueryService initialized with {} provider", provider.name());

        Self {
            provider,
            cache,
            counters,
        }
    }

    /// 查询单个 IP
    ///
    /// 语法错误返回 `is_valid == false` 的记录，不碰缓存和数据源；
    /// 数据源整体不可用时返回 `Err(SourceUnavailable)`。
    pub async fn query_one(&self, ip: &str) -> Result<IpLocation> {
        self.counters.record(1);
        self.query_uncounted(ip).await
    }

    /// 批量查询，结果与输入位置一一对应
    ///
    /// 空列表和超过 100 个地址直接整批拒绝；单个地址的失败
    /// 折叠成对应位置上的无效记录。
    pub async fn query_batch(&self, ips: &[String]) -> Result<Vec<IpLocation>> {
        if ips.is_empty() {
            return Err(IpQueryError::validation("IP list must not be empty"));
        }
        if ips.len() > MAX_BATCH_SIZE {
            return Err(IpQueryError::validation(format!(
                "batch size {} exceeds limit of {}",
                ips.len(),
                MAX_BATCH_SIZE
            )));
        }

        self.counters.record(ips.len() as u64);

        let mut results = Vec::with_capacity(ips.len());
        for ip in ips {
            match self.query_uncounted(ip).await {
                Ok(location) => results.push(location),
                Err(IpQueryError::SourceUnavailable(msg)) => {
                    return Err(IpQueryError::SourceUnavailable(msg));
                }
                Err(err) => {
                    results.push(IpLocation::invalid(ip.clone(), err.message().to_string()));
                }
            }
        }

        debug!("batch query resolved {} addresses", results.len());
        Ok(results)
    }

    /// 查询管线，不做计数（计数由 query_one / query_batch 负责）
    async fn query_uncounted(&self, ip: &str) -> Result<IpLocation> {
        if !is_valid_ip(ip) {
            return Ok(IpLocation::invalid(ip, "invalid IP address format"));
        }

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(ip) {
                debug!("cache hit for {}", ip);
                return Ok(cached);
            }
        }

        // 保留段不经过数据源，统一返回固定记录
        let location = if is_reserved_ip(ip) {
            IpLocation::local_network(ip)
        } else {
            let location = self.provider.resolve(ip).await.map_err(|err| {
                warn!("lookup failed for {}: {}", ip, err);
                err
            })?;
            if !location.is_valid {
                // 数据源没有这个地址的数据，不缓存
                return Ok(location);
            }
            location
        };

        if let Some(cache) = &self.cache {
            cache.put(ip.to_string(), location.clone());
        }

        Ok(location)
    }

    /// 服务状态快照，除读取外无副作用
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.counters.uptime_seconds(),
            query_count: self.counters.total(),
            cache_size: self.cache.as_ref().map(|c| c.len()).unwrap_or(0),
        }
    }

    /// 关闭服务：释放查询后端，停掉缓存清理任务。可重复调用。
    pub async fn shutdown(&self) {
        self.provider.close().await;
        if let Some(cache) = &self.cache {
            cache.stop();
        }
        info!("QueryService shut down");
    }
}
