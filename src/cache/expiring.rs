//! 带过期时间的内存缓存
//!
//! key → (记录, 绝对过期时间) 的并发存储。读操作之间可以并发，
//! 写入和后台清理互斥。缓存只负责存取，不关心条目从哪来，
//! 也从不阻塞调用方等待数据源。

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::lookup::IpLocation;

/// 清理周期下限，避免 TTL 过小（或为 0）时定时器空转
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// 缓存条目，过期时间为绝对时间点
struct CacheEntry {
    value: IpLocation,
    expires_at: Instant,
}

/// 带 TTL 的并发缓存
///
/// 后台清理任务与缓存同生命周期：`stop()` 或最后一个 Arc 释放时
/// 任务一并结束，不会在进程里遗留周期任务。
pub struct ExpiringCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl ExpiringCache {
    /// 创建缓存并启动后台清理任务，周期为 TTL/2（有下限）
    ///
    /// 必须在 tokio runtime 内调用。
    pub fn new(ttl: Duration) -> Arc<Self> {
        let cache = Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            sweeper: Mutex::new(None),
        });

        let period = (ttl / 2).max(MIN_SWEEP_INTERVAL);
        let handle = tokio::spawn(Self::sweep_loop(Arc::downgrade(&cache), period));
        *cache.sweeper.lock() = Some(handle);

        debug!("ExpiringCache initialized, ttl: {:?}, sweep period: {:?}", ttl, period);
        cache
    }

    /// 读取缓存，已过期但尚未清理的条目视为不存在
    pub fn get(&self, key: &str) -> Option<IpLocation> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.value.clone())
    }

    /// 插入或覆盖，过期时间重置为 now + TTL（读取不续期）
    pub fn put(&self, key: String, value: IpLocation) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().insert(key, entry);
    }

    /// 删除单个条目
    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// 清空整个缓存
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// 当前条目数，包含已过期但尚未清理的条目
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 停止后台清理任务，可重复调用
    pub fn stop(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
    }

    /// 移除所有已过期条目
    fn sweep(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            trace!("cache sweep removed {} expired entries", removed);
        }
    }

    async fn sweep_loop(cache: Weak<Self>, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match cache.upgrade() {
                Some(cache) => cache.sweep(),
                None => break,
            }
        }
    }
}

impl Drop for ExpiringCache {
    fn drop(&mut self) {
        self.stop();
    }
}
