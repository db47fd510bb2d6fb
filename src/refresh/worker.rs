//! The Refresh Worker: a periodic cleanup-then-repopulate cycle over the
//! routing table, driven entirely through the manager's `RoutingApi`.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::domain::entities::{parse_bid, Peer, Timestamp};
use crate::domain::routing_table::Snapshot;
use crate::domain::services::candidate_empty_prefixes;
use crate::domain::value_objects::timeouts;
use crate::manager::ManagerHandle;
use crate::ports::inbound::RoutingApi;
use crate::ports::outbound::PeerClient;
use crate::refresh::walk;

/// `api.show()` bounded by `timeouts::SNAPSHOT_REPLY`; an unresponsive
/// manager yields an empty snapshot rather than stalling the cycle forever.
async fn bounded_show(api: &ManagerHandle) -> Snapshot {
    tokio::time::timeout(timeouts::SNAPSHOT_REPLY, api.show())
        .await
        .unwrap_or_else(|_| Snapshot {
            bid: String::new(),
            depth: 0,
            k: 0,
            owner_peer_ctx: None,
            routing_table: Default::default(),
        })
}

/// Run refresh cycles forever, sleeping `timeouts::REFRESH_INTERVAL`
/// between each.
pub async fn run(api: ManagerHandle, client: Arc<dyn PeerClient>, self_peer: Peer) {
    loop {
        cycle(&api, &*client, &self_peer).await;
        tokio::time::sleep(timeouts::REFRESH_INTERVAL).await;
    }
}

async fn cycle(api: &ManagerHandle, client: &dyn PeerClient, self_peer: &Peer) {
    info!("refresh cycle starting");
    cleanup_pass(api, client).await;
    repopulation_pass(api, client, self_peer).await;
    info!("refresh cycle complete");
}

/// Ping every known peer; any that fails to answer is removed.
async fn cleanup_pass(api: &ManagerHandle, client: &dyn PeerClient) {
    let snapshot = bounded_show(api).await;
    let now = Timestamp::now();
    for (prefix, ctxs) in &snapshot.routing_table {
        for ctx in ctxs {
            let peer = match Peer::from_ctx(ctx, now) {
                Ok(p) => p,
                Err(e) => {
                    debug!(error = %e, "skipping malformed peer context during cleanup");
                    continue;
                }
            };
            let alive = client.ping(&peer).await.unwrap_or(false);
            if alive {
                if let Err(e) = api.refresh_touch(prefix.clone(), peer.kid).await {
                    debug!(error = %e, "cleanup: failed to update peer last-seen");
                }
            } else {
                debug!(bid = %peer.bid, "cleanup: peer unresponsive, removing");
                if let Err(e) = api.refresh_remove(prefix.clone(), peer.kid).await {
                    debug!(error = %e, "cleanup: failed to remove dead peer");
                }
            }
        }
    }
}

/// Find prefixes with no live peer and try to discover one via an
/// iterative `find_node` walk seeded by the peers we currently know.
async fn repopulation_pass(api: &ManagerHandle, client: &dyn PeerClient, self_peer: &Peer) {
    let snapshot = bounded_show(api).await;
    let self_kid = match parse_bid(&snapshot.bid) {
        Ok(k) => k,
        Err(_) => return,
    };
    let occupied: HashSet<String> = snapshot
        .routing_table
        .iter()
        .filter(|(_, ctxs)| !ctxs.is_empty())
        .map(|(prefix, _)| prefix.clone())
        .collect();
    let empty = candidate_empty_prefixes(self_kid, snapshot.depth, &occupied);
    if empty.is_empty() {
        return;
    }

    let now = Timestamp::now();
    let seeds: Vec<Peer> = snapshot
        .routing_table
        .values()
        .flatten()
        .filter_map(|ctx| Peer::from_ctx(ctx, now).ok())
        .collect();
    if seeds.is_empty() {
        debug!("repopulation: no seed peers known, skipping");
        return;
    }

    for prefix in empty {
        let target_bid = random_bid_with_prefix(&prefix, snapshot.depth);
        if let Some(discovered) = walk::walk(client, self_peer, &target_bid, &seeds).await {
            debug!(bid = %discovered.bid, prefix = %prefix, "repopulation: discovered peer");
            if let Err(e) = api.add(&discovered.peer_ctx()).await {
                debug!(error = %e, "repopulation: failed to add discovered peer");
            }
        }
    }
}

fn random_bid_with_prefix(prefix: &str, depth: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut bid = String::with_capacity(depth);
    bid.push_str(prefix);
    for _ in prefix.len()..depth {
        bid.push(if rng.gen_bool(0.5) { '1' } else { '0' });
    }
    bid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bid_preserves_prefix_and_depth() {
        let bid = random_bid_with_prefix("101", 8);
        assert_eq!(bid.len(), 8);
        assert!(bid.starts_with("101"));
    }
}
