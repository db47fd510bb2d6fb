//! Ports: the trait boundaries the domain and manager depend on, implemented
//! by concrete adapters in `transport`.

pub mod inbound;
pub mod outbound;

pub use inbound::RoutingApi;
pub use outbound::{FindNodeOutcome, PeerClient, TransportError};
