//! Encapsulation / Decapsulation Engines
//!
//! Table-driven traversal of the catalog. Payload bytes are never touched per
//! layer; traversal only drives paired progress reporting with a simulated
//! processing delay before each group.

use std::thread;
use std::time::Duration;

use super::layers::{envelope, rx_groups, tx_groups};
use crate::protocol::{Direction, PacketMessage, ProgressEvent};

/// Receives progress events as the engines emit them.
pub trait ProgressSink {
    fn progress(&mut self, event: ProgressEvent);
}

impl ProgressSink for Vec<ProgressEvent> {
    fn progress(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

/// Send direction: Application → Physical
#[derive(Debug, Clone, Copy)]
pub struct Encapsulator {
    delay: Duration,
}

impl Encapsulator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Emit TX events for (0,1), (2,3), (4,5), (6), then build the outbound
    /// packet carrying `payload` unchanged.
    pub fn run<S: ProgressSink + ?Sized>(&self, payload: &str, sink: &mut S) -> PacketMessage {
        for group in tx_groups() {
            pause(self.delay);
            sink.progress(ProgressEvent::new(Direction::Tx, group));
        }

        log::debug!("encapsulated view: {}", envelope(payload));
        PacketMessage::new(payload)
    }
}

/// Receive direction: Physical → Application
#[derive(Debug, Clone, Copy)]
pub struct Decapsulator {
    delay: Duration,
}

impl Decapsulator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Emit RX events for (5,6), (3,4), (1,2), (0). The last one marks
    /// command completion.
    pub fn run<S: ProgressSink + ?Sized>(&self, sink: &mut S) {
        for group in rx_groups() {
            pause(self.delay);
            sink.progress(ProgressEvent::new(Direction::Rx, group));
        }
    }
}

#[inline]
fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
