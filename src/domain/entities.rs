//! Core domain entities: identifiers, peers, timestamps.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::errors::RoutingError;

/// Unix timestamp in seconds.
///
/// Kept as its own type (rather than `std::time::SystemTime`) so tests can
/// construct fixed values instead of depending on wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }
}

/// A node identifier: the integer (KID) form of a `depth`-bit binary string
/// (BID). `depth` is a property of whichever routing table looks the value
/// up, not encoded in the type itself.
pub type Kid = u64;

/// Parse a binary identifier string into its integer form.
///
/// # Errors
/// Returns [`RoutingError::InvalidBid`] if `bid` is empty, longer than 64
/// characters, or contains anything other than `0`/`1`.
pub fn parse_bid(bid: &str) -> Result<Kid, RoutingError> {
    if bid.is_empty() || bid.len() > 64 || !bid.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(RoutingError::InvalidBid(bid.to_string()));
    }
    Kid::from_str_radix(bid, 2).map_err(|_| RoutingError::InvalidBid(bid.to_string()))
}

/// Render a KID as a BID, left-padded with zeros to exactly `depth` characters.
pub fn format_bid(kid: Kid, depth: usize) -> String {
    format!("{:0width$b}", kid, width = depth)
}

/// XOR distance between two KIDs.
pub fn xor_distance(a: Kid, b: Kid) -> u64 {
    a ^ b
}

/// A peer's identity and liveness state.
///
/// Two peers are equal iff their KIDs match; `owner_ctx` and `last_seen` are
/// mutable bookkeeping, not part of identity.
#[derive(Debug, Clone)]
pub struct Peer {
    pub bid: String,
    pub kid: Kid,
    pub ip: String,
    pub port: u16,
    pub last_seen: Timestamp,
    /// Serialized identity of whichever node holds this `Peer` reference
    /// (`"<bid> <ip> <port>"`), stamped by `RoutingTable::add` so outbound
    /// RPCs can advertise the caller's own identity. `None` until the peer
    /// has been placed in a table.
    pub owner_ctx: Option<String>,
}

impl PartialEq for Peer {
    fn eq(&self, other: &Self) -> bool {
        self.kid == other.kid
    }
}
impl Eq for Peer {}

impl Peer {
    pub fn new(bid: String, ip: String, port: u16, now: Timestamp) -> Result<Self, RoutingError> {
        let kid = parse_bid(&bid)?;
        Ok(Self {
            bid,
            kid,
            ip,
            port,
            last_seen: now,
            owner_ctx: None,
        })
    }

    /// Serialized peer context: `"<bid> <ip> <port>"`.
    pub fn peer_ctx(&self) -> String {
        format!("{} {} {}", self.bid, self.ip, self.port)
    }

    /// Parse a peer context string of the form `"<bid> <ip> <port>"`.
    pub fn from_ctx(ctx: &str, now: Timestamp) -> Result<Self, RoutingError> {
        let mut parts = ctx.split_whitespace();
        let bid = parts
            .next()
            .ok_or_else(|| RoutingError::InvalidPeerContext(ctx.to_string()))?;
        let ip = parts
            .next()
            .ok_or_else(|| RoutingError::InvalidPeerContext(ctx.to_string()))?;
        let port = parts
            .next()
            .ok_or_else(|| RoutingError::InvalidPeerContext(ctx.to_string()))?
            .parse::<u16>()
            .map_err(|_| RoutingError::InvalidPeerContext(ctx.to_string()))?;
        if parts.next().is_some() {
            return Err(RoutingError::InvalidPeerContext(ctx.to_string()));
        }
        Peer::new(bid.to_string(), ip.to_string(), port, now)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.peer_ctx())
    }
}
