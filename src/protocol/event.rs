//! Monitor Control Protocol
//!
//! Line-oriented, UTF-8, `\n`-terminated in both directions:
//! - client → monitor: satu JSON object per line ([`MonitorEvent`])
//! - monitor → client: plain text commands ([`MonitorCommand`])

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PacketMessage;
use crate::core::Layer;

pub const SEND_PREFIX: &str = "SEND:";

/// Arah traversal catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Encapsulation, outer → inner
    #[serde(rename = "TX")]
    Tx,
    /// Decapsulation, inner → outer
    #[serde(rename = "RX")]
    Rx,
}

/// One or two layers that just finished processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub direction: Direction,
    pub completed: Vec<String>,
}

impl ProgressEvent {
    pub fn new(direction: Direction, group: &[Layer]) -> Self {
        Self {
            direction,
            completed: group.iter().map(|l| l.name.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MonitorEvent {
    Info { text: String },
    Progress(ProgressEvent),
    Packet(PacketMessageView),
}

/// Reply packet as forwarded to the monitor (without its own `type` field,
/// which the event tag already carries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketMessageView {
    pub layers: Vec<String>,
    pub payload: String,
}

impl MonitorEvent {
    pub fn info(text: impl Into<String>) -> Self {
        Self::Info { text: text.into() }
    }

    pub fn packet(msg: &PacketMessage) -> Self {
        Self::Packet(PacketMessageView {
            layers: msg.layers.clone(),
            payload: msg.payload.clone(),
        })
    }

    /// Single JSON line including the trailing `\n`.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

impl From<ProgressEvent> for MonitorEvent {
    fn from(event: ProgressEvent) -> Self {
        Self::Progress(event)
    }
}

/// Parsed monitor line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    /// `SEND:<payload>`; payload may be empty.
    Send(String),
    Unknown(String),
}

impl MonitorCommand {
    /// Parse one raw line. Trailing `\r`/`\n` are stripped; `None` for an
    /// empty line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return None;
        }

        Some(match line.strip_prefix(SEND_PREFIX) {
            Some(payload) => Self::Send(payload.to_string()),
            None => Self::Unknown(line.to_string()),
        })
    }
}

/// Human-readable rendering of one event line, as printed by the monitor.
pub fn render_line(line: &str) -> String {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(_) => return format!("Invalid JSON from client monitor: {}", line),
    };

    match field_str(&value, "type") {
        Some("progress") => format!(
            "[{}] Completed: {}",
            field_str(&value, "direction").unwrap_or("TX"),
            field_list(&value, "completed").join(", ")
        ),
        Some("info") => format!("[INFO] {}", field_str(&value, "text").unwrap_or_default()),
        Some("packet") => format!(
            "[PACKET] layers={} payload='{}'",
            field_list(&value, "layers").len(),
            field_str(&value, "payload").unwrap_or_default()
        ),
        _ => format!("[UNKNOWN] {}", value),
    }
}

fn field_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn field_list<'a>(value: &'a Value, key: &str) -> Vec<&'a str> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
