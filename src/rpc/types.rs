//! RPC protocol type definitions
//!
//! Defines the types used for RPC communication:
//! - `RpcCommand`: Commands sent from client to server
//! - `RpcResponse`: Responses sent from server to client

use serde::{Deserialize, Serialize};

use crate::lookup::IpLocation;
use crate::service::ServiceStatus;

/// RPC commands sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RpcCommand {
    /// Heartbeat check - confirm server is alive and responsive
    Ping,

    /// Query a single IP address
    Query { ip: String },

    /// Query a batch of IP addresses
    BatchQuery { ips: Vec<String> },

    /// Query current service status
    GetStatus,
}

/// RPC responses sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RpcResponse {
    Pong { version: String },
    Location(IpLocation),
    Locations(Vec<IpLocation>),
    Status(ServiceStatus),
    Error { code: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_roundtrip() {
        let cmd = RpcCommand::Query {
            ip: "8.8.8.8".to_string(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let decoded: RpcCommand = serde_json::from_str(&json).unwrap();
        match decoded {
            RpcCommand::Query { ip } => assert_eq!(ip, "8.8.8.8"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_error_response_serde_roundtrip() {
        let resp = RpcResponse::Error {
            code: "E001".to_string(),
            message: "IP list must not be empty".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        let decoded: RpcResponse = serde_json::from_str(&json).unwrap();
        match decoded {
            RpcResponse::Error { code, .. } => assert_eq!(code, "E001"),
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
