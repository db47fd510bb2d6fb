//! A cheaply cloneable handle to the Routing Manager, the only thing the
//! RPC front-end and refresh worker hold onto.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::domain::entities::Peer;
use crate::domain::errors::RoutingError;
use crate::domain::routing_table::Snapshot;
use crate::domain::value_objects::RoutingConfig;
use crate::manager::commands::Command;
use crate::ports::inbound::RoutingApi;

#[derive(Clone)]
pub struct ManagerHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl ManagerHandle {
    pub fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    /// Used by the refresh worker, which needs `(prefix, kid)` pairs read
    /// straight off a snapshot rather than the `RoutingApi` surface.
    pub async fn refresh_remove(&self, prefix: String, kid: u64) -> Result<(), RoutingError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::RefreshRemove { prefix, kid, reply })
            .map_err(|_| RoutingError::InvalidPeerContext("manager channel closed".into()))?;
        rx.await
            .map_err(|_| RoutingError::InvalidPeerContext("manager dropped reply".into()))?
    }

    /// Updates a peer's `last_seen` after a successful cleanup-pass ping.
    pub async fn refresh_touch(&self, prefix: String, kid: u64) -> Result<(), RoutingError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::RefreshTouch { prefix, kid, reply })
            .map_err(|_| RoutingError::InvalidPeerContext("manager channel closed".into()))?;
        rx.await
            .map_err(|_| RoutingError::InvalidPeerContext("manager dropped reply".into()))?
    }
}

#[async_trait]
impl RoutingApi for ManagerHandle {
    async fn add(&self, peer_ctx: &str) -> Result<(), RoutingError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Add {
                peer_ctx: peer_ctx.to_string(),
                reply,
            })
            .map_err(|_| RoutingError::InvalidPeerContext("manager channel closed".into()))?;
        rx.await
            .map_err(|_| RoutingError::InvalidPeerContext("manager dropped reply".into()))?
    }

    async fn add_caller(&self, peer_ctx: &str) -> Result<(), RoutingError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::AddCaller {
                peer_ctx: peer_ctx.to_string(),
                reply,
            })
            .map_err(|_| RoutingError::InvalidPeerContext("manager channel closed".into()))?;
        rx.await
            .map_err(|_| RoutingError::InvalidPeerContext("manager dropped reply".into()))?
    }

    async fn find_node(&self, target_bid: &str) -> Result<Option<Peer>, RoutingError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::FindNode {
                target_bid: target_bid.to_string(),
                reply,
            })
            .map_err(|_| RoutingError::InvalidPeerContext("manager channel closed".into()))?;
        rx.await
            .map_err(|_| RoutingError::InvalidPeerContext("manager dropped reply".into()))?
    }

    async fn refresh_remove(&self, prefix: String, kid: u64) -> Result<(), RoutingError> {
        ManagerHandle::refresh_remove(self, prefix, kid).await
    }

    async fn refresh_touch(&self, prefix: String, kid: u64) -> Result<(), RoutingError> {
        ManagerHandle::refresh_touch(self, prefix, kid).await
    }

    async fn refresh_get_config(&self) -> (String, RoutingConfig) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::RefreshGetConfig { reply }).is_err() {
            return (String::new(), RoutingConfig::default());
        }
        rx.await.unwrap_or((String::new(), RoutingConfig::default()))
    }

    async fn show(&self) -> Snapshot {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Show { reply }).is_err() {
            return Snapshot {
                bid: String::new(),
                depth: 0,
                k: 0,
                owner_peer_ctx: None,
                routing_table: Default::default(),
            };
        }
        rx.await.unwrap_or(Snapshot {
            bid: String::new(),
            depth: 0,
            k: 0,
            owner_peer_ctx: None,
            routing_table: Default::default(),
        })
    }

    async fn show_node_view(&self) -> String {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::ShowNodeView { reply }).is_err() {
            return String::new();
        }
        rx.await.unwrap_or_default()
    }
}
