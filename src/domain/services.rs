//! Pure helper functions shared by the routing table and the refresh walk.
//!
//! Nothing here owns state; everything is a free function over `Kid`/`Peer`
//! values so it can be unit tested without a table instance.

use std::collections::HashSet;

use crate::domain::entities::{format_bid, xor_distance, Kid, Peer};

/// The bucket a peer with the given `kid` belongs to, relative to `self_kid`,
/// expressed as the binary prefix string (`depth` characters) of the first
/// point at which `self_kid` and `kid` diverge.
///
/// This is the string-BID analogue of a byte-wise "find the first differing
/// bit, that's your bucket index" scan: instead of a fixed bucket index we
/// return the literal prefix, since buckets here are keyed by prefix string
/// rather than by a fixed `0..256` index. Every peer that lands in bucket
/// `p` has a BID starting with `p`, so `p` is built from `self_kid`'s bits
/// up to the divergence point plus the *opposite* of `self_kid`'s bit at
/// that point — never `self_kid`'s own bit there, which would make `p` the
/// local node's own prefix instead of the peer's.
pub fn bucket_prefix(self_kid: Kid, kid: Kid, depth: usize) -> String {
    let distance = xor_distance(self_kid, kid);
    // Bit `depth - 1` is the most significant bit of the `depth`-bit space.
    let first_diff_bit = (0..depth)
        .find(|&i| distance & (1 << (depth - 1 - i)) != 0)
        .unwrap_or(depth.saturating_sub(1))
        .min(depth.saturating_sub(1));
    let full = format!("{:0width$b}", self_kid, width = depth);
    let mut prefix: Vec<char> = full[..=first_diff_bit].chars().collect();
    if let Some(last) = prefix.last_mut() {
        *last = if *last == '0' { '1' } else { '0' };
    }
    prefix.into_iter().collect()
}

/// Sort peers by ascending XOR distance from `target`, breaking ties by
/// lower KID.
pub fn sort_by_distance(peers: &mut [Peer], target: Kid) {
    peers.sort_by(|a, b| {
        let da = xor_distance(a.kid, target);
        let db = xor_distance(b.kid, target);
        da.cmp(&db).then(a.kid.cmp(&b.kid))
    });
}

/// The single nearest peer to `target`, or `None` if `peers` is empty.
pub fn nearest<'a>(peers: &'a [Peer], target: Kid) -> Option<&'a Peer> {
    peers.iter().min_by(|a, b| {
        let da = xor_distance(a.kid, target);
        let db = xor_distance(b.kid, target);
        da.cmp(&db).then(a.kid.cmp(&b.kid))
    })
}

/// One representative prefix per bucket length (`0..depth`) that is not in
/// `occupied`: the local node's own prefix at that length with its last bit
/// flipped, mirroring the "first differing bit" bucket-key convention.
/// Used by the refresh worker to pick prefixes worth repopulating.
pub fn candidate_empty_prefixes(
    self_kid: Kid,
    depth: usize,
    occupied: &HashSet<String>,
) -> Vec<String> {
    let full = format_bid(self_kid, depth);
    (0..depth)
        .map(|len| {
            let mut chars: Vec<char> = full.chars().take(len + 1).collect();
            if let Some(last) = chars.last_mut() {
                *last = if *last == '0' { '1' } else { '0' };
            }
            chars.into_iter().collect::<String>()
        })
        .filter(|prefix| !occupied.contains(prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Timestamp;

    #[test]
    fn bucket_prefix_diverges_at_first_differing_bit_and_flips_it() {
        // self = 0000, peer = 1000 -> diverge at bit 0 -> prefix "1"
        // (self's own bit there is '0'; the peer's bucket prefix is the
        // opposite, '1', never self's own unflipped bit).
        assert_eq!(bucket_prefix(0b0000, 0b1000, 4), "1");
        // self = 0000, peer = 0001 -> diverge at bit 3 -> prefix "0001"
        assert_eq!(bucket_prefix(0b0000, 0b0001, 4), "0001");
    }

    #[test]
    fn bucket_prefix_matches_four_peer_placement_example() {
        // self = 0101, depth = 4: peers 1000/0000/0110/0100 land in buckets
        // "1"/"00"/"011"/"0100" respectively, each a prefix of the peer's
        // own BID, never of self's.
        let self_kid = 0b0101;
        assert_eq!(bucket_prefix(self_kid, 0b1000, 4), "1");
        assert_eq!(bucket_prefix(self_kid, 0b0000, 4), "00");
        assert_eq!(bucket_prefix(self_kid, 0b0110, 4), "011");
        assert_eq!(bucket_prefix(self_kid, 0b0100, 4), "0100");
    }

    #[test]
    fn sort_by_distance_orders_ascending_with_kid_tiebreak() {
        let now = Timestamp::new(0);
        let mut peers = vec![
            Peer::new("0110".into(), "10.0.0.1".into(), 1, now).unwrap(),
            Peer::new("0001".into(), "10.0.0.2".into(), 2, now).unwrap(),
            Peer::new("1111".into(), "10.0.0.3".into(), 3, now).unwrap(),
        ];
        sort_by_distance(&mut peers, 0b0000);
        assert_eq!(peers[0].bid, "0001");
    }

    #[test]
    fn nearest_picks_closest_by_xor() {
        let now = Timestamp::new(0);
        let peers = vec![
            Peer::new("0110".into(), "10.0.0.1".into(), 1, now).unwrap(),
            Peer::new("0001".into(), "10.0.0.2".into(), 2, now).unwrap(),
        ];
        let n = nearest(&peers, 0b0000).unwrap();
        assert_eq!(n.bid, "0001");
    }
}
