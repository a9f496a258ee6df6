//! 网络连通性探测
//!
//! 每次调用都重新解析域名，CDN 后的 IP 变化不会影响结果

use std::time::Duration;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

/// 在超时时间内能否与 `addr` (host:port) 建立 TCP 连接
pub async fn check_connection(addr: &str, limit: Duration) -> bool {
    let socket_addr = match timeout(limit, lookup_host(addr)).await {
        Ok(Ok(mut addrs)) => addrs.next(),
        Ok(Err(e)) => {
            log::debug!("Failed to resolve {}: {}", addr, e);
            None
        }
        Err(_) => {
            log::debug!("Resolving {} timed out", addr);
            None
        }
    };

    let Some(socket_addr) = socket_addr else {
        return false;
    };

    match timeout(limit, TcpStream::connect(socket_addr)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            log::debug!("Connection to {} failed: {}", socket_addr, e);
            false
        }
        Err(_) => {
            log::debug!("Connection to {} timed out", socket_addr);
            false
        }
    }
}
