//! Events the Routing Manager sends to the Node-View Observer.

use tokio::sync::oneshot;

use crate::domain::entities::Kid;

/// One membership change, or a render request. The manager is the sole
/// producer; the observer owns its trie exclusively and never touches the
/// routing table directly.
#[derive(Debug)]
pub enum ObserverEvent {
    Add(Kid),
    Remove(Kid),
    Show(oneshot::Sender<String>),
}
