//! Commands accepted by the Routing Manager actor. Each variant that
//! expects a reply embeds its own `oneshot::Sender`, so concurrent callers
//! never share a reply slot and no correlation ID scheme is needed.

use tokio::sync::oneshot;

use crate::domain::entities::{Kid, Peer};
use crate::domain::errors::RoutingError;
use crate::domain::routing_table::Snapshot;
use crate::domain::value_objects::RoutingConfig;

#[derive(Debug)]
pub enum Command {
    Add {
        peer_ctx: String,
        reply: oneshot::Sender<Result<(), RoutingError>>,
    },
    AddCaller {
        peer_ctx: String,
        reply: oneshot::Sender<Result<(), RoutingError>>,
    },
    FindNode {
        target_bid: String,
        reply: oneshot::Sender<Result<Option<Peer>, RoutingError>>,
    },
    RefreshRemove {
        prefix: String,
        kid: Kid,
        reply: oneshot::Sender<Result<(), RoutingError>>,
    },
    RefreshTouch {
        prefix: String,
        kid: Kid,
        reply: oneshot::Sender<Result<(), RoutingError>>,
    },
    RefreshGetConfig {
        reply: oneshot::Sender<(String, RoutingConfig)>,
    },
    Show {
        reply: oneshot::Sender<Snapshot>,
    },
    ShowNodeView {
        reply: oneshot::Sender<String>,
    },
}
