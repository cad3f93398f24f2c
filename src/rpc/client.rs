//! RPC 客户端
//!
//! 供测试和运维脚本使用的简单阻塞式调用封装：每次调用发送一条
//! 命令并等待一条响应。

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::errors::{IpQueryError, Result};
use crate::lookup::IpLocation;
use crate::rpc::protocol;
use crate::rpc::types::{RpcCommand, RpcResponse};
use crate::service::ServiceStatus;

/// 与 RPC 服务器的单条连接
pub struct RpcClient {
    stream: TcpStream,
    buf: BytesMut,
}

impl RpcClient {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| IpQueryError::internal(format!("RPC connect to {} failed: {}", addr, e)))?;
        Ok(Self {
            stream,
            buf: BytesMut::with_capacity(4 * 1024),
        })
    }

    /// 发送一条命令并等待响应
    pub async fn send_command(&mut self, command: &RpcCommand) -> Result<RpcResponse> {
        let frame = protocol::encode(command)?;
        self.stream.write_all(&frame).await?;

        loop {
            if let Some(response) = protocol::decode::<RpcResponse>(&mut self.buf)? {
                return Ok(response);
            }
            let n = self.stream.read_buf(&mut self.buf).await?;
            if n == 0 {
                return Err(IpQueryError::protocol("connection closed by server"));
            }
        }
    }

    /// 心跳，返回服务器版本号
    pub async fn ping(&mut self) -> Result<String> {
        match self.send_command(&RpcCommand::Ping).await? {
            RpcResponse::Pong { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    /// 查询单个 IP
    pub async fn query(&mut self, ip: &str) -> Result<IpLocation> {
        let command = RpcCommand::Query { ip: ip.to_string() };
        match self.send_command(&command).await? {
            RpcResponse::Location(location) => Ok(location),
            RpcResponse::Error { code, message } => Err(remote_error(code, message)),
            other => Err(unexpected(other)),
        }
    }

    /// 批量查询
    pub async fn query_batch(&mut self, ips: &[String]) -> Result<Vec<IpLocation>> {
        let command = RpcCommand::BatchQuery { ips: ips.to_vec() };
        match self.send_command(&command).await? {
            RpcResponse::Locations(locations) => Ok(locations),
            RpcResponse::Error { code, message } => Err(remote_error(code, message)),
            other => Err(unexpected(other)),
        }
    }

    /// 获取服务状态
    pub async fn get_status(&mut self) -> Result<ServiceStatus> {
        match self.send_command(&RpcCommand::GetStatus).await? {
            RpcResponse::Status(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }
}

/// 还原服务端错误分类，调用方可以按 code 区分请求错误和服务错误
fn remote_error(code: String, message: String) -> IpQueryError {
    match code.as_str() {
        "E001" => IpQueryError::Validation(message),
        "E002" => IpQueryError::SourceUnavailable(message),
        _ => IpQueryError::Internal(message),
    }
}

fn unexpected(response: RpcResponse) -> IpQueryError {
    IpQueryError::protocol(format!("unexpected response: {:?}", response))
}
