//! Iterative `find_node` walk used by the refresh worker's repopulation
//! pass: starting from a list of seed peers, sorted nearest-first to the
//! target, follow each seed's chain of "closer peer" answers until it
//! terminates or `MAX_TRIES` hops are exhausted, then move to the next seed.

use std::collections::HashSet;

use crate::domain::entities::{parse_bid, Kid, Peer};
use crate::domain::services::sort_by_distance;
use crate::ports::outbound::PeerClient;

/// Per-seed hop budget before giving up on that seed's chain and moving to
/// the next.
pub const MAX_TRIES: u32 = 3;

/// Walk toward `target_bid`, returning the last peer successfully
/// contacted (a live peer discovered along the way, suitable for
/// repopulating an empty bucket) or `None` if every seed's chain died
/// immediately.
pub async fn walk(
    client: &dyn PeerClient,
    caller: &Peer,
    target_bid: &str,
    seeds: &[Peer],
) -> Option<Peer> {
    let target_kid: Kid = parse_bid(target_bid).ok()?;
    let mut sorted_seeds = seeds.to_vec();
    sort_by_distance(&mut sorted_seeds, target_kid);

    let mut visited: HashSet<Kid> = HashSet::new();
    let mut discovered = None;

    for seed in sorted_seeds {
        if visited.contains(&seed.kid) {
            continue;
        }
        let mut current = seed;
        let mut tries = 0u32;
        loop {
            visited.insert(current.kid);
            match client.find_node(&current, target_bid, caller).await {
                Ok(outcome) if outcome.timed_out => break,
                Ok(outcome) => {
                    discovered = Some(current.clone());
                    match outcome.closer_peer {
                        Some(closer) if !visited.contains(&closer.kid) => {
                            tries += 1;
                            if tries >= MAX_TRIES {
                                break;
                            }
                            current = closer;
                        }
                        _ => break,
                    }
                }
                Err(_) => break,
            }
        }
    }

    discovered
}
