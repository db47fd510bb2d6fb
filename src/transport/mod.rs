//! Concrete transport adapters: a TCP-based `PeerClient` and RPC server.
//! Swappable behind `ports::outbound::PeerClient` and `ports::inbound`
//! without touching the routing core.

pub mod client;
pub mod server;
pub mod wire;

pub use client::TcpPeerClient;
pub use wire::{RpcRequest, RpcResponse};
