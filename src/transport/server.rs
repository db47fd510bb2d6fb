//! Inbound RPC front-end: one short-lived task per connection, translating
//! wire requests into `RoutingApi` calls and replies.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, error, warn};

use crate::ports::inbound::RoutingApi;
use crate::transport::wire::{RpcRequest, RpcResponse};

/// Runs the accept loop for as long as the process lives; each connection
/// is handled on its own task and closed after one request/response.
pub async fn run(listener: TcpListener, api: Arc<dyn RoutingApi>) {
    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "failed to accept inbound connection");
                continue;
            }
        };
        let api = Arc::clone(&api);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, api).await {
                error!(peer = %peer_addr, error = %e, "inbound connection failed");
            }
        });
    }
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    api: Arc<dyn RoutingApi>,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let request: RpcRequest = match serde_json::from_str(line.trim()) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "malformed inbound rpc request");
            let response = RpcResponse::Error(format!("malformed request: {e}"));
            write_response(&mut write_half, &response).await?;
            return Ok(());
        }
    };

    debug!(?request, "handling inbound rpc");
    let response = dispatch(&*api, request).await;
    write_response(&mut write_half, &response).await
}

async fn dispatch(api: &dyn RoutingApi, request: RpcRequest) -> RpcResponse {
    match request {
        RpcRequest::Ping => RpcResponse::Pong,
        RpcRequest::FindNode {
            target_bid,
            caller_ctx,
        } => {
            if let Err(e) = api.add_caller(&caller_ctx).await {
                warn!(error = %e, "failed to register caller from find_node");
            }
            match api.find_node(&target_bid).await {
                Ok(peer) => RpcResponse::FindNodeResult {
                    peer_ctx: peer.map(|p| p.peer_ctx()),
                },
                Err(e) => RpcResponse::Error(e.to_string()),
            }
        }
        RpcRequest::Add { peer_ctx } => match api.add(&peer_ctx).await {
            Ok(()) => RpcResponse::Ack,
            Err(e) => RpcResponse::Error(e.to_string()),
        },
        RpcRequest::RoutingTableShow => RpcResponse::RoutingTableSnapshot(api.show().await),
        RpcRequest::ShowNodeView => RpcResponse::NodeView(api.show_node_view().await),
    }
}

async fn write_response(
    write_half: &mut tokio::net::tcp::OwnedWriteHalf,
    response: &RpcResponse,
) -> std::io::Result<()> {
    let mut line = serde_json::to_string(response).unwrap_or_else(|_| {
        serde_json::to_string(&RpcResponse::Error("failed to serialize response".into()))
            .unwrap()
    });
    line.push('\n');
    write_half.write_all(line.as_bytes()).await
}
