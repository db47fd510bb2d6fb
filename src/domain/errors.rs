//! Domain errors for the routing core.

use thiserror::Error;

/// Errors surfaced by the routing domain layer.
///
/// These are all locally detectable from the data at hand; transport-layer
/// failures (timeouts, connection refusal) live in
/// [`crate::transport::TransportError`] instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// A BID string was empty, too long, or contained characters other than
    /// `0`/`1`.
    #[error("invalid binary identifier: {0:?}")]
    InvalidBid(String),

    /// A peer context string (`"<bid> <ip> <port>"`) did not parse.
    #[error("invalid peer context: {0:?}")]
    InvalidPeerContext(String),

    /// Attempted to add the local node's own BID to its routing table.
    #[error("cannot add the local node's own bid to its routing table")]
    SelfConnection,

    /// `refresh_remove` named a KID that isn't present in the given bucket.
    #[error("peer {kid} not found in bucket {prefix:?}")]
    PeerNotFound { prefix: String, kid: u64 },

    /// No bucket matched a peer's BID. Unreachable if the routing table's
    /// shape invariant holds.
    #[error("no bucket matches prefix for bid {0:?}")]
    NoMatchingBucket(String),

    /// A routing-table snapshot failed to deserialize or referenced a
    /// `(bid, depth, k)` inconsistent with itself.
    #[error("malformed routing table snapshot: {0}")]
    SnapshotDecode(String),
}
