//! Serializable routing-table snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A point-in-time view of a [`super::table::RoutingTable`], suitable for
/// the `routing_table_show` RPC and for the refresh worker's
/// snapshot-then-plan cycle. Round-trips through
/// [`super::table::RoutingTable::rebuild_from_snapshot`] by replaying each
/// bucket's peer contexts through ordinary insertion.
///
/// `routing_table` is a `BTreeMap` rather than a `HashMap` so two snapshots
/// of the same table serialize to byte-identical JSON regardless of
/// insertion order — a `HashMap`'s iteration order isn't stable across
/// instances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub bid: String,
    pub depth: usize,
    pub k: usize,
    pub owner_peer_ctx: Option<String>,
    /// Bucket prefix -> peer contexts (`"<bid> <ip> <port>"`), oldest first.
    pub routing_table: BTreeMap<String, Vec<String>>,
}
