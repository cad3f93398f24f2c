//! RPC 前端
//!
//! 基于 TCP 的长度前缀 JSON 协议（4 字节大端长度 + JSON 负载），
//! 是 HTTP API 之外的第二个协议前端，两者共用同一个 QueryService。
//!
//! - **types.rs**: 协议类型定义（命令、响应）
//! - **protocol.rs**: 编解码（length-prefixed JSON）
//! - **server.rs**: RPC 服务器，随 HTTP 服务器一起启动
//! - **client.rs**: RPC 客户端封装

pub mod client;
pub mod protocol;
pub mod server;
pub mod types;

pub use client::RpcClient;
pub use server::start_rpc_server;
pub use types::{RpcCommand, RpcResponse};
