//! Network Layer: blocking TCP plumbing
//!
//! - [`Connection`]: framed client ↔ server stream
//! - [`Responder`]: server accept loop, satu exchange per koneksi
//! - [`MonitorListener`] / [`MonitorLink`]: monitor control channel
//! - [`Session`]: client orchestrator tying them together

mod connection;
mod monitor;
mod server;
mod session;

pub use connection::Connection;
pub use monitor::{MonitorLink, MonitorListener};
pub use server::{respond, Responder, ResponderStats};
pub use session::Session;
