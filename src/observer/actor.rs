//! The Node-View Observer task: owns the membership trie exclusively and
//! drains events sent by the Routing Manager.

use tokio::sync::mpsc;
use tracing::debug;

use crate::observer::events::ObserverEvent;
use crate::observer::trie::NodeViewTrie;

pub async fn run(depth: usize, mut events: mpsc::UnboundedReceiver<ObserverEvent>) {
    let mut trie = NodeViewTrie::new(depth);
    while let Some(event) = events.recv().await {
        match event {
            ObserverEvent::Add(kid) => {
                debug!(kid, "node-view: add");
                trie.add(kid);
            }
            ObserverEvent::Remove(kid) => {
                debug!(kid, "node-view: remove");
                trie.remove(kid);
            }
            ObserverEvent::Show(reply) => {
                let _ = reply.send(trie.render());
            }
        }
    }
}
