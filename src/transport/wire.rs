//! Wire messages exchanged between nodes: one JSON object per line over a
//! freshly opened TCP connection, closed after the response is written.

use serde::{Deserialize, Serialize};

use crate::domain::routing_table::Snapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RpcRequest {
    Ping,
    FindNode { target_bid: String, caller_ctx: String },
    Add { peer_ctx: String },
    RoutingTableShow,
    ShowNodeView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RpcResponse {
    Pong,
    FindNodeResult { peer_ctx: Option<String> },
    Ack,
    RoutingTableSnapshot(Snapshot),
    NodeView(String),
    Error(String),
}
