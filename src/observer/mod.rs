//! Node-View Observer: a single task mirroring peer membership in a binary
//! trie, independent of the routing table's own bucket structure.

mod actor;
mod events;
mod trie;

pub use actor::run;
pub use events::ObserverEvent;
pub use trie::NodeViewTrie;
