//! Packet Message Format
//!
//! Body of every frame between client and server:
//!
//! ```text
//! {"type":"packet","layers":["Application",...,"Physical"],"payload":"Hello"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::layer_names;

pub const ACK_PREFIX: &str = "ACK: ";

/// Discriminator field of a packet body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Packet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    pub layers: Vec<String>,
    pub payload: String,
}

impl PacketMessage {
    /// Packet declaring the full catalog around `payload`.
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            msg_type: MessageType::Packet,
            layers: layer_names(),
            payload: payload.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Best-effort view of a received body. Never fails.
    ///
    /// `payload` degrades to `""` when the body is not JSON, not an object,
    /// or lacks the field. Numbers and booleans keep their JSON text.
    /// `layers` falls back to the catalog when absent.
    pub fn from_json_lossy(body: &[u8]) -> Self {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

        let payload = match value.get("payload") {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            _ => String::new(),
        };

        let layers = value
            .get("layers")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|l| l.as_str().map(str::to_string))
                    .collect::<Vec<_>>()
            })
            .filter(|layers| !layers.is_empty())
            .unwrap_or_else(layer_names);

        Self {
            msg_type: MessageType::Packet,
            layers,
            payload,
        }
    }

    /// Server reply: same declared layers, payload prefixed with `ACK: `.
    pub fn acknowledge(&self) -> Self {
        Self {
            msg_type: MessageType::Packet,
            layers: self.layers.clone(),
            payload: format!("{}{}", ACK_PREFIX, self.payload),
        }
    }
}
