//! Routing table: prefix-keyed K-buckets owned by one node.

mod bucket;
mod snapshot;
mod table;

pub use bucket::{InsertOutcome, KBucket};
pub use snapshot::Snapshot;
pub use table::RoutingTable;

#[cfg(test)]
mod tests;
