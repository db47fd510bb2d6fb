//! Refresh Worker: periodic cleanup and repopulation of the routing table.

mod walk;
mod worker;

pub use walk::{walk, MAX_TRIES};
pub use worker::run;
