//! Core module: layer catalog dan engine
//!
//! Prinsip desain:
//! - Catalog adalah tabel konstan, bukan call chain per layer
//! - Engine hanya melaporkan progress; payload tidak diubah

mod engine;
mod layers;

pub use engine::{Decapsulator, Encapsulator, ProgressSink};
pub use layers::{
    envelope, layer_names, peel, rx_groups, strip_envelope, tx_groups, Layer, LAYERS, LAYER_COUNT,
};
