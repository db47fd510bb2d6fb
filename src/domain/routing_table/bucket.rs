//! K-bucket: a capacity-bounded set of peers sharing a routing-table prefix.

use crate::domain::entities::{Kid, Peer, Timestamp};

/// Outcome of attempting to insert a peer into a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The peer was admitted directly (bucket had spare capacity, or the
    /// KID was already present, in which case this is a no-op).
    Admitted,
    /// The bucket is full and a policy decision is required: is the
    /// current head of the bucket still alive? Carries the peer that would
    /// need to be challenged.
    NeedsChallenge(Peer),
}

/// A single K-bucket: at most `k` peers, ordered oldest-seen-first.
#[derive(Debug, Clone)]
pub struct KBucket {
    k: usize,
    peers: Vec<Peer>,
}

impl KBucket {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            peers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.peers.len() >= self.k
    }

    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }

    pub fn peers_mut(&mut self) -> &mut [Peer] {
        &mut self.peers
    }

    pub fn contains(&self, kid: Kid) -> bool {
        self.peers.iter().any(|p| p.kid == kid)
    }

    /// Try to insert `peer`. A duplicate KID is a no-op rather than a
    /// move-to-tail refresh; liveness refresh happens via an explicit
    /// successful ping, not a second `add`.
    pub fn try_insert(&mut self, peer: Peer) -> InsertOutcome {
        if self.contains(peer.kid) {
            return InsertOutcome::Admitted;
        }
        if !self.is_full() {
            self.peers.push(peer);
            return InsertOutcome::Admitted;
        }
        InsertOutcome::NeedsChallenge(self.peers[0].clone())
    }

    /// Resolve a pending challenge: `head_alive` reports whether the peer at
    /// the front of the bucket answered a liveness ping at `now`.
    ///
    /// - If alive: the head's `last_seen` is updated to `now`, it's moved to
    ///   the tail (refreshed), and `peer` is rejected.
    /// - If dead: the head is evicted and `peer` is admitted at the tail.
    pub fn resolve_challenge(&mut self, peer: Peer, head_alive: bool, now: Timestamp) -> InsertOutcome {
        if self.peers.is_empty() {
            self.peers.push(peer);
            return InsertOutcome::Admitted;
        }
        if head_alive {
            let mut head = self.peers.remove(0);
            head.last_seen = now;
            self.peers.push(head);
        } else {
            self.peers.remove(0);
            self.peers.push(peer);
        }
        InsertOutcome::Admitted
    }

    pub fn remove(&mut self, kid: Kid) -> Option<Peer> {
        let idx = self.peers.iter().position(|p| p.kid == kid)?;
        Some(self.peers.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Timestamp;

    fn peer(bid: &str) -> Peer {
        Peer::new(bid.to_string(), "127.0.0.1".to_string(), 4242, Timestamp::new(0)).unwrap()
    }

    #[test]
    fn admits_under_capacity() {
        let mut bucket = KBucket::new(2);
        assert_eq!(bucket.try_insert(peer("0001")), InsertOutcome::Admitted);
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn duplicate_kid_is_a_noop() {
        let mut bucket = KBucket::new(2);
        bucket.try_insert(peer("0001"));
        assert_eq!(bucket.try_insert(peer("0001")), InsertOutcome::Admitted);
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn full_bucket_requests_challenge() {
        let mut bucket = KBucket::new(1);
        bucket.try_insert(peer("0001"));
        match bucket.try_insert(peer("0010")) {
            InsertOutcome::NeedsChallenge(head) => assert_eq!(head.bid, "0001"),
            other => panic!("expected NeedsChallenge, got {other:?}"),
        }
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn challenge_resolved_alive_refreshes_head_and_rejects_newcomer() {
        let mut bucket = KBucket::new(1);
        bucket.try_insert(peer("0001"));
        let outcome = bucket.resolve_challenge(peer("0010"), true, Timestamp::new(42));
        assert_eq!(outcome, InsertOutcome::Admitted);
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.peers()[0].bid, "0001");
        assert_eq!(bucket.peers()[0].last_seen, Timestamp::new(42));
    }

    #[test]
    fn challenge_resolved_dead_evicts_head_and_admits_newcomer() {
        let mut bucket = KBucket::new(1);
        bucket.try_insert(peer("0001"));
        bucket.resolve_challenge(peer("0010"), false, Timestamp::new(42));
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.peers()[0].bid, "0010");
    }

    #[test]
    fn remove_takes_peer_out() {
        let mut bucket = KBucket::new(2);
        bucket.try_insert(peer("0001"));
        let removed = bucket.remove(0b0001);
        assert!(removed.is_some());
        assert!(bucket.is_empty());
    }
}
