//! UDP transport
//!
//! The protocol is one datagram out, one datagram in. [`Transport`] is the
//! seam the client talks through; [`UdpTransport`] is the real socket.

use crate::error::{ClientError, Result};
use crate::protocol::{MAX_PACKET_SIZE, MAX_RECEIVE_SIZE};
use async_trait::async_trait;
use log::{debug, trace};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// One request/response datagram exchange
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `datagram` and wait for the single reply datagram
    async fn exchange(&self, datagram: &[u8]) -> Result<Vec<u8>>;
}

/// Datagram counters
#[derive(Debug, Default, Clone)]
pub struct TransportStats {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Transport over a connected UDP socket
pub struct UdpTransport {
    socket: UdpSocket,
    reply_deadline: Duration,
    stats: Mutex<TransportStats>,
}

impl UdpTransport {
    /// Bind a local port and connect to the server
    ///
    /// The server replies to the source port, so the socket stays connected
    /// for the client's lifetime.
    pub async fn connect(
        local_port: u16,
        server_host: &str,
        server_port: u16,
        reply_deadline: Duration,
    ) -> Result<Self> {
        debug!("binding UDP socket on port {local_port}");
        let socket = UdpSocket::bind(("0.0.0.0", local_port)).await?;

        debug!("connecting to {server_host}:{server_port}");
        socket.connect((server_host, server_port)).await?;

        Ok(Self {
            socket,
            reply_deadline,
            stats: Mutex::new(TransportStats::default()),
        })
    }

    /// Local socket address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Snapshot of the datagram counters
    pub async fn stats(&self) -> TransportStats {
        self.stats.lock().await.clone()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(&self, datagram: &[u8]) -> Result<Vec<u8>> {
        if datagram.is_empty() {
            return Err(ClientError::encoding("empty datagram"));
        }
        if datagram.len() > MAX_PACKET_SIZE {
            return Err(ClientError::payload_too_large(
                datagram.len(),
                MAX_PACKET_SIZE,
            ));
        }

        let sent = self.socket.send(datagram).await?;
        trace!("sent {sent} bytes");

        let mut buffer = vec![0u8; MAX_RECEIVE_SIZE];
        let received = timeout(self.reply_deadline, self.socket.recv(&mut buffer))
            .await
            .map_err(|_| ClientError::NetworkTimeout(self.reply_deadline))??;
        buffer.truncate(received);
        trace!("received {received} bytes");

        let mut stats = self.stats.lock().await;
        stats.packets_sent += 1;
        stats.bytes_sent += sent as u64;
        stats.packets_received += 1;
        stats.bytes_received += received as u64;

        Ok(buffer)
    }
}
