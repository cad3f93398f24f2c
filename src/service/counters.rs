use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// 服务级计数器
///
/// 进程生命周期内的累计查询数（只增不减）和启动时间。
/// 在构造 QueryService 时显式传入，不做全局状态。
#[derive(Debug)]
pub struct ServiceCounters {
    queries: AtomicU64,
    started_at: DateTime<Utc>,
}

impl ServiceCounters {
    pub fn new() -> Self {
        Self {
            queries: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    /// 累加查询计数，任意并发下不丢更新
    pub fn record(&self, n: u64) {
        self.queries.fetch_add(n, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

impl Default for ServiceCounters {
    fn default() -> Self {
        Self::new()
    }
}
