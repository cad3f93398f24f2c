//! IP 归属查询模块
//!
//! 提供 IP 地址的语法校验、保留段判断和归属查询，支持：
//! - MaxMind GeoLite2 本地数据库
//! - 随机数据 mock（测试/离线）

pub mod classifier;
mod maxmind;
mod mock;
mod provider;
mod record;

pub use classifier::{is_reserved_ip, is_routable_ip, is_valid_ip};
pub use maxmind::MaxMindProvider;
pub use mock::MockProvider;
pub use provider::LookupProvider;
pub use record::IpLocation;
