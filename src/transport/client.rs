//! Concrete outbound peer client over TCP.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::domain::entities::Peer;
use crate::domain::value_objects::timeouts;
use crate::ports::outbound::{FindNodeOutcome, PeerClient, TransportError};
use crate::transport::wire::{RpcRequest, RpcResponse};

/// Sends one request per connection: dial, write a JSON line, read a JSON
/// line back, close. Simple at the cost of a fresh TCP handshake per call,
/// which is fine at this node's expected scale.
pub struct TcpPeerClient;

impl TcpPeerClient {
    pub fn new() -> Self {
        Self
    }

    async fn call(
        &self,
        peer: &Peer,
        request: &RpcRequest,
    ) -> Result<RpcResponse, TransportError> {
        let addr = format!("{}:{}", peer.ip, peer.port);
        let mut stream = TcpStream::connect(&addr)
            .await
            .map_err(|_| TransportError::ConnectionFailed(addr.clone()))?;

        let mut line = serde_json::to_string(request)
            .map_err(|e| TransportError::Protocol(addr.clone(), e.to_string()))?;
        line.push('\n');
        stream
            .write_all(line.as_bytes())
            .await
            .map_err(|_| TransportError::ConnectionFailed(addr.clone()))?;

        let mut reader = BufReader::new(stream);
        let mut response_line = String::new();
        reader
            .read_line(&mut response_line)
            .await
            .map_err(|_| TransportError::ConnectionFailed(addr.clone()))?;

        serde_json::from_str(response_line.trim())
            .map_err(|e| TransportError::Protocol(addr, e.to_string()))
    }
}

impl Default for TcpPeerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeerClient for TcpPeerClient {
    async fn ping(&self, peer: &Peer) -> Result<bool, TransportError> {
        debug!(bid = %peer.bid, "pinging peer");
        match tokio::time::timeout(timeouts::PING, self.call(peer, &RpcRequest::Ping)).await {
            Ok(Ok(RpcResponse::Pong)) => Ok(true),
            Ok(Ok(_)) => Err(TransportError::Protocol(
                peer.peer_ctx(),
                "unexpected response to ping".to_string(),
            )),
            Ok(Err(_)) => Ok(false),
            Err(_) => {
                warn!(bid = %peer.bid, "ping timed out");
                Ok(false)
            }
        }
    }

    async fn find_node(
        &self,
        peer: &Peer,
        target_bid: &str,
        caller: &Peer,
    ) -> Result<FindNodeOutcome, TransportError> {
        let request = RpcRequest::FindNode {
            target_bid: target_bid.to_string(),
            caller_ctx: caller.peer_ctx(),
        };
        match tokio::time::timeout(timeouts::FIND_NODE, self.call(peer, &request)).await {
            Ok(Ok(RpcResponse::FindNodeResult { peer_ctx })) => {
                let closer_peer = match peer_ctx {
                    Some(ctx) if ctx != caller.peer_ctx() => {
                        Some(Peer::from_ctx(&ctx, crate::domain::entities::Timestamp::now())
                            .map_err(|e| TransportError::Protocol(peer.peer_ctx(), e.to_string()))?)
                    }
                    _ => None,
                };
                Ok(FindNodeOutcome {
                    closer_peer,
                    timed_out: false,
                })
            }
            Ok(Ok(_)) => Err(TransportError::Protocol(
                peer.peer_ctx(),
                "unexpected response to find_node".to_string(),
            )),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(bid = %peer.bid, "find_node timed out");
                Ok(FindNodeOutcome {
                    closer_peer: None,
                    timed_out: true,
                })
            }
        }
    }
}
