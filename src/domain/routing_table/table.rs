//! The routing table: a prefix-keyed map of K-buckets owned by one node.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::entities::{parse_bid, xor_distance, Kid, Peer, Timestamp};
use crate::domain::errors::RoutingError;
use crate::domain::routing_table::bucket::{InsertOutcome, KBucket};
use crate::domain::routing_table::snapshot::Snapshot;
use crate::domain::services::bucket_prefix;
use crate::domain::value_objects::{timeouts, RoutingConfig};
use crate::ports::outbound::PeerClient;

/// A node's routing table: its own identity plus the set of K-buckets it
/// currently knows peers in, keyed by the prefix at which a peer's KID
/// first diverges from the local KID.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    self_bid: String,
    self_kid: Kid,
    config: RoutingConfig,
    /// This node's own advertised context (`"<bid> <ip> <port>"`), stamped
    /// onto every peer this table admits.
    owner_peer_ctx: Option<String>,
    buckets: HashMap<String, KBucket>,
}

impl RoutingTable {
    pub fn new(self_bid: &str, config: RoutingConfig) -> Result<Self, RoutingError> {
        let self_kid = parse_bid(self_bid)?;
        Ok(Self {
            self_bid: self_bid.to_string(),
            self_kid,
            config,
            owner_peer_ctx: None,
            buckets: HashMap::new(),
        })
    }

    pub fn set_owner_peer_ctx(&mut self, ctx: String) {
        self.owner_peer_ctx = Some(ctx);
    }

    pub fn self_bid(&self) -> &str {
        &self.self_bid
    }

    pub fn config(&self) -> RoutingConfig {
        self.config
    }

    fn prefix_for(&self, kid: Kid) -> String {
        bucket_prefix(self.self_kid, kid, self.config.depth)
    }

    /// Insert a peer into the table, challenge-pinging the target bucket's
    /// head if it's full. Rejects the local node's own BID before any
    /// bucket lookup.
    pub async fn add(
        &mut self,
        mut peer: Peer,
        client: &dyn PeerClient,
    ) -> Result<(), RoutingError> {
        if peer.kid == self.self_kid {
            return Err(RoutingError::SelfConnection);
        }
        peer.owner_ctx = self.owner_peer_ctx.clone();
        let prefix = self.prefix_for(peer.kid);
        let bucket = self
            .buckets
            .entry(prefix.clone())
            .or_insert_with(|| KBucket::new(self.config.k));

        match bucket.try_insert(peer.clone()) {
            InsertOutcome::Admitted => {
                debug!(bid = %peer.bid, prefix = %prefix, "peer admitted");
                Ok(())
            }
            InsertOutcome::NeedsChallenge(head) => {
                let alive = tokio::time::timeout(timeouts::PING, client.ping(&head))
                    .await
                    .map(|r| r.unwrap_or(false))
                    .unwrap_or(false);
                if alive {
                    info!(head = %head.bid, candidate = %peer.bid, "bucket full, head alive, candidate rejected");
                } else {
                    info!(head = %head.bid, candidate = %peer.bid, "bucket full, head dead, evicting");
                }
                bucket.resolve_challenge(peer, alive, Timestamp::now());
                Ok(())
            }
        }
    }

    /// Find the single nearest known peer to `target_bid` across the whole
    /// table (local-only, no network calls).
    pub fn find_nearest_node(&self, target_bid: &str) -> Result<Option<Peer>, RoutingError> {
        let target_kid = parse_bid(target_bid)?;
        let nearest = self
            .buckets
            .values()
            .flat_map(|b| b.peers().iter())
            .min_by(|a, b| {
                let da = xor_distance(a.kid, target_kid);
                let db = xor_distance(b.kid, target_kid);
                da.cmp(&db).then(a.kid.cmp(&b.kid))
            })
            .cloned();
        Ok(nearest)
    }

    /// Update a peer's `last_seen` after a successful liveness ping (the
    /// refresh worker's cleanup pass; challenge pings during insertion go
    /// through `KBucket::resolve_challenge` directly).
    pub fn touch(&mut self, prefix: &str, kid: Kid, now: Timestamp) -> Result<(), RoutingError> {
        let bucket = self
            .buckets
            .get_mut(prefix)
            .ok_or_else(|| RoutingError::NoMatchingBucket(prefix.to_string()))?;
        let peer = bucket
            .peers_mut()
            .iter_mut()
            .find(|p| p.kid == kid)
            .ok_or(RoutingError::PeerNotFound {
                prefix: prefix.to_string(),
                kid,
            })?;
        peer.last_seen = now;
        Ok(())
    }

    /// Remove a peer by KID from the bucket matching `prefix` (refresh
    /// worker cleanup pass).
    pub fn remove(&mut self, prefix: &str, kid: Kid) -> Result<Peer, RoutingError> {
        let bucket = self
            .buckets
            .get_mut(prefix)
            .ok_or_else(|| RoutingError::NoMatchingBucket(prefix.to_string()))?;
        bucket.remove(kid).ok_or(RoutingError::PeerNotFound {
            prefix: prefix.to_string(),
            kid,
        })
    }

    /// All non-empty bucket prefixes and the peers in them, as owned data —
    /// used by the refresh worker's cleanup/repopulation passes.
    pub fn all_peers(&self) -> Vec<(String, Peer)> {
        self.buckets
            .iter()
            .flat_map(|(prefix, b)| b.peers().iter().map(move |p| (prefix.clone(), p.clone())))
            .collect()
    }

    pub fn to_snapshot(&self) -> Snapshot {
        let mut routing_table = BTreeMap::new();
        for (prefix, bucket) in &self.buckets {
            routing_table.insert(
                prefix.clone(),
                bucket.peers().iter().map(|p| p.peer_ctx()).collect(),
            );
        }
        Snapshot {
            bid: self.self_bid.clone(),
            depth: self.config.depth,
            k: self.config.k,
            owner_peer_ctx: self.owner_peer_ctx.clone(),
            routing_table,
        }
    }

    /// Rebuild a table from a snapshot by replaying each bucket's peer
    /// contexts through plain insertion. Synchronous and ping-free: a valid
    /// snapshot never has an over-capacity bucket, so replay never needs a
    /// liveness challenge.
    pub fn rebuild_from_snapshot(snapshot: &Snapshot) -> Result<Self, RoutingError> {
        let config = RoutingConfig::new(snapshot.depth, snapshot.k);
        let mut table = RoutingTable::new(&snapshot.bid, config)?;
        table.owner_peer_ctx = snapshot.owner_peer_ctx.clone();
        let now = Timestamp::now();
        for (prefix, ctxs) in &snapshot.routing_table {
            let bucket = table
                .buckets
                .entry(prefix.clone())
                .or_insert_with(|| KBucket::new(config.k));
            for ctx in ctxs {
                let mut peer = Peer::from_ctx(ctx, now)
                    .map_err(|e| RoutingError::SnapshotDecode(e.to_string()))?;
                peer.owner_ctx = snapshot.owner_peer_ctx.clone();
                if let InsertOutcome::NeedsChallenge(_) = bucket.try_insert(peer) {
                    return Err(RoutingError::SnapshotDecode(format!(
                        "bucket {prefix:?} exceeds capacity {}",
                        config.k
                    )));
                }
            }
        }
        Ok(table)
    }

    /// Ping timeout used for challenge pings, exposed for callers that want
    /// to match the same bound elsewhere (e.g. the refresh worker's cleanup
    /// pass).
    pub fn challenge_timeout() -> Duration {
        timeouts::PING
    }
}
