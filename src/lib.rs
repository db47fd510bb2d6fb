//! A Kademlia-style structured overlay node.
//!
//! The crate follows a hexagonal layout:
//! - `domain`: pure routing logic (XOR distance, K-buckets, the routing
//!   table itself) with no I/O.
//! - `ports`: the trait boundaries the domain and manager depend on
//!   (`RoutingApi` inbound, `PeerClient` outbound).
//! - `transport`: the concrete TCP adapters implementing those ports.
//! - `manager`, `observer`, `refresh`: the three long-lived tasks that make
//!   up the running node, talking to each other only through channels.
//!
//! `config` and `main.rs` wire these together into the `kad-node` binary.

pub mod config;
pub mod domain;
pub mod manager;
pub mod observer;
pub mod ports;
pub mod refresh;
pub mod transport;

pub use domain::entities::{Kid, Peer, Timestamp};
pub use domain::errors::RoutingError;
pub use domain::routing_table::{RoutingTable, Snapshot};
pub use domain::value_objects::RoutingConfig;
pub use manager::ManagerHandle;
pub use ports::{PeerClient, RoutingApi, TransportError};
