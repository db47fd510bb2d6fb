//! End-to-end scenarios exercising the routing table against a scripted
//! peer client.

use async_trait::async_trait;
use std::sync::Mutex;

use super::*;
use crate::domain::entities::{parse_bid, Peer, Timestamp};
use crate::domain::errors::RoutingError;
use crate::domain::value_objects::RoutingConfig;
use crate::ports::outbound::{FindNodeOutcome, PeerClient, TransportError};

/// A peer client whose `ping` answers are scripted per-KID, defaulting to
/// "alive" for anything unlisted.
struct ScriptedClient {
    dead: Mutex<Vec<u64>>,
}

impl ScriptedClient {
    fn new(dead: Vec<u64>) -> Self {
        Self {
            dead: Mutex::new(dead),
        }
    }
}

#[async_trait]
impl PeerClient for ScriptedClient {
    async fn ping(&self, peer: &Peer) -> Result<bool, TransportError> {
        Ok(!self.dead.lock().unwrap().contains(&peer.kid))
    }

    async fn find_node(
        &self,
        _peer: &Peer,
        _target_bid: &str,
        _caller: &Peer,
    ) -> Result<FindNodeOutcome, TransportError> {
        Ok(FindNodeOutcome {
            closer_peer: None,
            timed_out: false,
        })
    }
}

fn peer(bid: &str) -> Peer {
    Peer::new(bid.to_string(), "127.0.0.1".to_string(), 4242, Timestamp::new(0)).unwrap()
}

fn table(self_bid: &str, depth: usize, k: usize) -> RoutingTable {
    RoutingTable::new(self_bid, RoutingConfig::new(depth, k)).unwrap()
}

// Placement: each of four peers lands in the bucket whose key is the
// longest prefix_i = self_bid[0..i] . flip(self_bid[i]) that it matches,
// never self_bid's own unflipped prefix.
#[tokio::test]
async fn scenario_a_four_peer_placement() {
    let mut t = table("0101", 4, 2);
    let client = ScriptedClient::new(vec![]);
    for bid in ["1000", "0000", "0110", "0100"] {
        t.add(peer(bid), &client).await.unwrap();
    }

    let mut placements: Vec<(String, String)> = t
        .all_peers()
        .into_iter()
        .map(|(prefix, p)| (prefix, p.bid))
        .collect();
    placements.sort();

    let mut expected = vec![
        ("1".to_string(), "1000".to_string()),
        ("00".to_string(), "0000".to_string()),
        ("011".to_string(), "0110".to_string()),
        ("0100".to_string(), "0100".to_string()),
    ];
    expected.sort();
    assert_eq!(placements, expected);
}

// Eviction: a full bucket challenges its head; a live head is refreshed and
// keeps its place, a dead head is evicted in its favor.
#[tokio::test]
async fn scenario_b_eviction() {
    let mut t = table("0000", 4, 1);
    let alive_client = ScriptedClient::new(vec![]);
    t.add(peer("1000"), &alive_client).await.unwrap();

    t.add(peer("1111"), &alive_client).await.unwrap();
    let peers: Vec<_> = t.all_peers().into_iter().map(|(_, p)| p.bid).collect();
    assert_eq!(peers, vec!["1000".to_string()]);

    let dead_kid = parse_bid("1000").unwrap();
    let dead_client = ScriptedClient::new(vec![dead_kid]);
    t.add(peer("1111"), &dead_client).await.unwrap();
    let peers: Vec<_> = t.all_peers().into_iter().map(|(_, p)| p.bid).collect();
    assert_eq!(peers, vec!["1111".to_string()]);
}

// Nearest: picks the peer with the lowest XOR distance to the query KID.
#[tokio::test]
async fn scenario_c_nearest() {
    let mut t = table("0000", 4, 3);
    let client = ScriptedClient::new(vec![]);
    t.add(peer("0001"), &client).await.unwrap(); // KID 1
    t.add(peer("1000"), &client).await.unwrap(); // KID 8
    t.add(peer("1111"), &client).await.unwrap(); // KID 15

    let nearest = t.find_nearest_node("1001").unwrap().unwrap(); // target KID 9
    assert_eq!(nearest.kid, 8);
}

// Roundtrip: a non-full table survives serialize -> rebuild -> serialize
// with byte-identical JSON.
#[tokio::test]
async fn scenario_d_roundtrip_is_byte_identical() {
    let mut t = table("0000", 4, 2);
    let client = ScriptedClient::new(vec![]);
    t.add(peer("1000"), &client).await.unwrap();
    t.add(peer("0001"), &client).await.unwrap();
    t.add(peer("0110"), &client).await.unwrap();

    let snapshot = t.to_snapshot();
    let first_json = serde_json::to_string(&snapshot).unwrap();

    let rebuilt = RoutingTable::rebuild_from_snapshot(&snapshot).unwrap();
    let second_json = serde_json::to_string(&rebuilt.to_snapshot()).unwrap();

    assert_eq!(first_json, second_json);
}

#[tokio::test]
async fn fresh_table_admits_first_peer() {
    let mut t = table("0000", 4, 1);
    let client = ScriptedClient::new(vec![]);
    t.add(peer("1111"), &client).await.unwrap();
    assert_eq!(t.all_peers().len(), 1);
}

#[tokio::test]
async fn self_insertion_rejected() {
    let mut t = table("0000", 4, 1);
    let client = ScriptedClient::new(vec![]);
    let err = t.add(peer("0000"), &client).await.unwrap_err();
    assert_eq!(err, RoutingError::SelfConnection);
}

#[tokio::test]
async fn duplicate_insertion_is_noop() {
    let mut t = table("0000", 4, 2);
    let client = ScriptedClient::new(vec![]);
    t.add(peer("1111"), &client).await.unwrap();
    t.add(peer("1111"), &client).await.unwrap();
    assert_eq!(t.all_peers().len(), 1);
}

#[tokio::test]
async fn find_nearest_node_picks_lowest_xor_distance() {
    let mut t = table("0000", 4, 2);
    let client = ScriptedClient::new(vec![]);
    t.add(peer("1000"), &client).await.unwrap();
    t.add(peer("0001"), &client).await.unwrap();

    let nearest = t.find_nearest_node("0000").unwrap().unwrap();
    assert_eq!(nearest.bid, "0001");
}

#[tokio::test]
async fn remove_errors_on_unknown_kid() {
    let mut t = table("0000", 4, 1);
    let client = ScriptedClient::new(vec![]);
    t.add(peer("1000"), &client).await.unwrap();
    // "1000" diverges from self at bit 0, landing in bucket "1"; asking
    // that bucket for a KID it doesn't hold is PeerNotFound, distinct from
    // asking an unknown bucket prefix.
    let err = t.remove("1", 0b1111).unwrap_err();
    assert!(matches!(err, RoutingError::PeerNotFound { .. }));

    let err = t.remove("nonexistent-prefix", 0b1111).unwrap_err();
    assert!(matches!(err, RoutingError::NoMatchingBucket(_)));
}

#[tokio::test]
async fn owner_ctx_is_stamped_by_the_table_not_the_caller() {
    let mut t = table("0000", 4, 1);
    t.set_owner_peer_ctx("0000 10.0.0.1 4242".to_string());
    let client = ScriptedClient::new(vec![]);
    t.add(peer("1000"), &client).await.unwrap();
    let (_, inserted) = &t.all_peers()[0];
    assert_eq!(inserted.owner_ctx.as_deref(), Some("0000 10.0.0.1 4242"));
}

#[tokio::test]
async fn challenge_ping_refreshes_head_last_seen() {
    let mut t = table("0000", 4, 1);
    let client = ScriptedClient::new(vec![]);
    t.add(peer("1000"), &client).await.unwrap();
    t.add(peer("1111"), &client).await.unwrap();

    let (_, head) = &t.all_peers()[0];
    assert_eq!(head.bid, "1000");
    assert!(head.last_seen.as_secs() > 0);
}
