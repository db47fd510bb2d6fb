//! Inbound port: the operations the RPC front-end and refresh worker drive
//! against the routing core, independent of how that core is actually run
//! (a single actor task behind channels, in this crate's case).

use async_trait::async_trait;

use crate::domain::entities::Peer;
use crate::domain::errors::RoutingError;
use crate::domain::routing_table::Snapshot;
use crate::domain::value_objects::RoutingConfig;

/// The routing table's public operation set. `ManagerHandle` is the sole
/// implementor, forwarding each call as a `Command` into the manager's
/// channel.
#[async_trait]
pub trait RoutingApi: Send + Sync {
    /// Insert a peer discovered via an inbound `find_node`/`ping` answer.
    async fn add(&self, peer_ctx: &str) -> Result<(), RoutingError>;

    /// Insert the peer that originated an inbound RPC, stamping its own
    /// advertised context as `owner_ctx` the way `add` does for discovered
    /// peers.
    async fn add_caller(&self, peer_ctx: &str) -> Result<(), RoutingError>;

    /// Local-only nearest-peer lookup.
    async fn find_node(&self, target_bid: &str) -> Result<Option<Peer>, RoutingError>;

    /// Remove a peer by KID from the bucket matching `prefix`, used by the
    /// refresh worker's cleanup pass.
    async fn refresh_remove(&self, prefix: String, kid: u64) -> Result<(), RoutingError>;

    /// Update a peer's `last_seen` after a successful cleanup-pass ping.
    async fn refresh_touch(&self, prefix: String, kid: u64) -> Result<(), RoutingError>;

    /// A snapshot of `(self_bid, config)` the refresh worker needs to plan
    /// its cycle.
    async fn refresh_get_config(&self) -> (String, RoutingConfig);

    /// Full routing-table snapshot, for the `routing_table_show` RPC and
    /// the refresh worker.
    async fn show(&self) -> Snapshot;

    /// Render the node-view trie (delegates to the Node-View Observer).
    async fn show_node_view(&self) -> String;
}
