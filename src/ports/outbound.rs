//! Outbound port: how the node talks to other peers over the wire.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Peer;

/// Failure modes specific to the network boundary, kept separate from
/// [`crate::domain::errors::RoutingError`] so a timeout or refused
/// connection never has to masquerade as a domain-data problem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("call to {0} timed out")]
    Timeout(String),

    #[error("connection to {0} refused or reset")]
    ConnectionFailed(String),

    #[error("malformed response from {0}: {1}")]
    Protocol(String, String),
}

/// Result of an outbound `find_node` call: the remote's best-known peer
/// closer to the target, and whether the call itself timed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindNodeOutcome {
    /// `None` when the remote has nothing closer, or answered with the
    /// caller's own context (the terminal "no peer" case).
    pub closer_peer: Option<Peer>,
    pub timed_out: bool,
}

/// Outbound calls this node makes to other peers. Implemented concretely by
/// `transport::client::TcpPeerClient`; the manager and refresh worker only
/// ever see this trait object, never the transport it runs over.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Liveness check. Returns `Ok(true)` if the peer answered, `Ok(false)`
    /// if it timed out cleanly. `Err` only for connection-level failures
    /// that aren't a plain "didn't answer".
    async fn ping(&self, peer: &Peer) -> Result<bool, TransportError>;

    /// Ask `peer` for whoever it knows that's closest to `target_kid`,
    /// advertising `caller` as the asking node's own context.
    async fn find_node(
        &self,
        peer: &Peer,
        target_bid: &str,
        caller: &Peer,
    ) -> Result<FindNodeOutcome, TransportError>;
}
