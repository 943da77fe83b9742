//! Protocol Layer
//!
//! Dua protokol:
//! - client ↔ server: length-prefixed frames carrying JSON packets
//! - client ↔ monitor: newline-delimited text commands and JSON events

mod event;
mod frame;
mod message;

pub use event::{
    render_line, Direction, MonitorCommand, MonitorEvent, PacketMessageView, ProgressEvent,
    SEND_PREFIX,
};
pub use frame::{encode_frame, read_frame, write_frame, LENGTH_PREFIX_SIZE};
pub use message::{MessageType, PacketMessage, ACK_PREFIX};
