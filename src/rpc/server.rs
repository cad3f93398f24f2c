//! RPC 服务器
//!
//! tokio TCP 监听，每个连接一个任务，一条连接上可以连续发多条
//! 命令。所有命令都转发给共享的 QueryService 处理，错误以
//! `RpcResponse::Error` 帧返回，连接级 IO 错误直接断开。

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::errors::{IpQueryError, Result};
use crate::rpc::protocol;
use crate::rpc::types::{RpcCommand, RpcResponse};
use crate::service::QueryService;

const READ_BUF_SIZE: usize = 4 * 1024;

/// 启动 RPC 服务器，绑定失败返回 Err
///
/// 返回实际绑定的地址（端口 0 时由系统分配），随后在后台任务里
/// 接受连接直到进程退出。
pub async fn start_rpc_server(
    addr: &str,
    service: Arc<QueryService>,
) -> Result<std::net::SocketAddr> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| IpQueryError::internal(format!("RPC bind failed on {}: {}", addr, e)))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| IpQueryError::internal(e.to_string()))?;

    info!("RPC server listening on {}", local_addr);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    debug!("RPC connection from {}", peer);
                    let service = service.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, service).await {
                            warn!("RPC connection from {} closed with error: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    error!("RPC accept failed: {}", e);
                }
            }
        }
    });

    Ok(local_addr)
}

/// 处理一条连接上的命令流
async fn handle_connection(mut stream: TcpStream, service: Arc<QueryService>) -> Result<()> {
    let mut buf = BytesMut::with_capacity(READ_BUF_SIZE);

    loop {
        // 先把缓冲里已有的完整帧全部处理掉
        while let Some(command) = protocol::decode::<RpcCommand>(&mut buf)? {
            let response = dispatch(&command, &service).await;
            let frame = protocol::encode(&response)?;
            stream.write_all(&frame).await?;
        }

        let n = stream.read_buf(&mut buf).await?;
        if n == 0 {
            // 对端正常关闭
            return Ok(());
        }
    }
}

/// 单条命令分发
async fn dispatch(command: &RpcCommand, service: &QueryService) -> RpcResponse {
    match command {
        RpcCommand::Ping => RpcResponse::Pong {
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        RpcCommand::Query { ip } => match service.query_one(ip).await {
            Ok(location) => RpcResponse::Location(location),
            Err(err) => error_frame(err),
        },
        RpcCommand::BatchQuery { ips } => match service.query_batch(ips).await {
            Ok(locations) => RpcResponse::Locations(locations),
            Err(err) => error_frame(err),
        },
        RpcCommand::GetStatus => RpcResponse::Status(service.status()),
    }
}

fn error_frame(err: IpQueryError) -> RpcResponse {
    RpcResponse::Error {
        code: err.code().to_string(),
        message: err.message().to_string(),
    }
}
