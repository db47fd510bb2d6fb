//! The Routing Manager task: sole mutator of the routing table, and the
//! only component that talks to the Node-View Observer.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::domain::entities::{Peer, Timestamp};
use crate::domain::routing_table::RoutingTable;
use crate::manager::commands::Command;
use crate::observer::ObserverEvent;
use crate::ports::outbound::PeerClient;

pub async fn run(
    mut table: RoutingTable,
    client: Arc<dyn PeerClient>,
    node_view: mpsc::UnboundedSender<ObserverEvent>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = commands.recv().await {
        handle(&mut table, &*client, &node_view, command).await;
    }
}

async fn handle(
    table: &mut RoutingTable,
    client: &dyn PeerClient,
    node_view: &mpsc::UnboundedSender<ObserverEvent>,
    command: Command,
) {
    match command {
        Command::Add { peer_ctx, reply } | Command::AddCaller { peer_ctx, reply } => {
            debug!(%peer_ctx, "manager: add");
            let result = insert(table, client, node_view, &peer_ctx).await;
            let _ = reply.send(result);
        }
        Command::FindNode { target_bid, reply } => {
            let result = table.find_nearest_node(&target_bid);
            let _ = reply.send(result);
        }
        Command::RefreshRemove { prefix, kid, reply } => {
            let result = table.remove(&prefix, kid);
            if result.is_ok() {
                let _ = node_view.send(ObserverEvent::Remove(kid));
            }
            let _ = reply.send(result.map(|_| ()));
        }
        Command::RefreshTouch { prefix, kid, reply } => {
            let result = table.touch(&prefix, kid, Timestamp::now());
            let _ = reply.send(result);
        }
        Command::RefreshGetConfig { reply } => {
            let _ = reply.send((table.self_bid().to_string(), table.config()));
        }
        Command::Show { reply } => {
            let _ = reply.send(table.to_snapshot());
        }
        Command::ShowNodeView { reply } => {
            let (tx, rx) = oneshot::channel();
            if node_view.send(ObserverEvent::Show(tx)).is_err() {
                warn!("node-view observer channel closed");
                let _ = reply.send(String::new());
                return;
            }
            let rendered = rx.await.unwrap_or_default();
            let _ = reply.send(rendered);
        }
    }
}

async fn insert(
    table: &mut RoutingTable,
    client: &dyn PeerClient,
    node_view: &mpsc::UnboundedSender<ObserverEvent>,
    peer_ctx: &str,
) -> Result<(), crate::domain::errors::RoutingError> {
    let peer = Peer::from_ctx(peer_ctx, Timestamp::now())?;
    let kid = peer.kid;
    table.add(peer, client).await?;
    let _ = node_view.send(ObserverEvent::Add(kid));
    Ok(())
}
