//! 查询后端抽象层
//!
//! 统一的 IP 归属查询接口，根据配置在启动时选择实现：
//! 1. `database.provider = "maxmind"` 且数据库可读 → MaxMindProvider
//! 2. `database.provider = "mock"` → MockProvider（离线/测试）
//!
//! 保留地址的短路处理不在 provider 内，由 QueryService 统一负责，
//! 各实现只需要处理可路由地址。

use async_trait::async_trait;

use crate::errors::Result;
use crate::lookup::record::IpLocation;

/// IP 归属查询 trait
///
/// `resolve` 的调用方负责先做语法校验；实现可以防御性地再校验一次。
/// 单个地址查不到数据时返回 `is_valid == false` 的记录而不是 Err，
/// 只有数据源整体不可用（未初始化 / 已关闭）才返回
/// `IpQueryError::SourceUnavailable`。
#[async_trait]
pub trait LookupProvider: Send + Sync {
    /// 查询单个 IP 地址的归属信息
    async fn resolve(&self, ip: &str) -> Result<IpLocation>;

    /// 批量查询，单个地址的失败折叠成该位置上的无效记录，
    /// 不中断整批
    async fn resolve_batch(&self, ips: &[String]) -> Result<Vec<IpLocation>> {
        let mut results = Vec::with_capacity(ips.len());
        for ip in ips {
            match self.resolve(ip).await {
                Ok(location) => results.push(location),
                Err(err) => {
                    if matches!(err, crate::errors::IpQueryError::SourceUnavailable(_)) {
                        return Err(err);
                    }
                    results.push(IpLocation::invalid(ip.clone(), err.message().to_string()));
                }
            }
        }
        Ok(results)
    }

    /// 释放底层资源，可重复调用；关闭后 `resolve` 必须返回
    /// `SourceUnavailable`
    async fn close(&self);

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}
