//! A Ricart–Agrawala / Lamport-clock distributed mutual-exclusion core that
//! arbitrates exclusive access to a single stateless printer across a static
//! set of peer client nodes.

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod message;
pub mod net;
pub mod node;
pub mod peer_client;
pub mod printer;
pub mod printer_client;
pub mod server;
pub mod state;
