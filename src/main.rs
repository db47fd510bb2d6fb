use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};

use kad_node::config::{Cli, NodeConfig};
use kad_node::domain::entities::{Peer, Timestamp};
use kad_node::domain::routing_table::RoutingTable;
use kad_node::domain::value_objects::RoutingConfig;
use kad_node::manager::{self, ManagerHandle};
use kad_node::observer;
use kad_node::ports::{PeerClient, RoutingApi};
use kad_node::refresh;
use kad_node::transport::client::TcpPeerClient;
use kad_node::transport::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = NodeConfig::from_cli(cli).map_err(|e| -> Box<dyn std::error::Error> {
        error!(error = %e, "invalid configuration");
        e.into()
    })?;

    info!(bid = %config.self_bid, ip = %config.ip, port = config.port, "starting node");

    let mut table = RoutingTable::new(
        &config.self_bid,
        RoutingConfig::new(config.depth, config.k),
    )?;
    let self_peer = Peer::new(
        config.self_bid.clone(),
        config.ip.clone(),
        config.port,
        Timestamp::now(),
    )?;
    table.set_owner_peer_ctx(self_peer.peer_ctx());

    let client: Arc<dyn PeerClient> = Arc::new(TcpPeerClient::new());

    let (node_view_tx, node_view_rx) = mpsc::unbounded_channel();
    tokio::spawn(observer::run(config.depth, node_view_rx));

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    tokio::spawn(manager::run(
        table,
        Arc::clone(&client),
        node_view_tx,
        command_rx,
    ));
    let handle = ManagerHandle::new(command_tx);

    if let Some((bid, ip, port)) = &config.bootstrap {
        let bootstrap_ctx = format!("{bid} {ip} {port}");
        info!(%bootstrap_ctx, "adding bootstrap peer");
        if let Err(e) = handle.add(&bootstrap_ctx).await {
            error!(error = %e, "failed to add bootstrap peer");
        }
    }

    tokio::spawn(refresh::run(
        handle.clone(),
        Arc::clone(&client),
        self_peer,
    ));

    let bind_addr = format!("{}:{}", config.ip, config.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "rpc listener bound");

    let api: Arc<dyn RoutingApi> = Arc::new(handle);
    tokio::select! {
        _ = server::run(listener, api) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
