//! osilink - OSI layer encapsulation simulator
//!
//! Arsitektur:
//! - Client ↔ Server: 4-byte big-endian length-prefixed JSON packets
//! - Client ↔ Monitor: newline-delimited commands in, JSON events out
//! - Seven-layer catalog driving paired TX/RX progress reporting
//!
//! Binaries: `osilink_server`, `osilink_client`, `osilink_monitor`.

pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod protocol;

pub use config::{ClientConfig, ServerConfig};
pub use error::{ExchangeError, FrameError};
pub use network::{Connection, MonitorListener, Responder, Session};
