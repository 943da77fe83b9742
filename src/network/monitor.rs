//! Monitor Control Link
//!
//! Satu koneksi monitor per proses client. Outgoing events are JSON lines;
//! a missing or broken monitor turns every emit into a no-op.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use crate::core::ProgressSink;
use crate::protocol::{MonitorEvent, ProgressEvent};

/// Listener that hands out exactly one monitor connection.
pub struct MonitorListener {
    listener: TcpListener,
}

impl MonitorListener {
    pub fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr)?,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Block until a monitor connects. The listener is closed afterwards.
    pub fn accept_once(self) -> io::Result<(TcpStream, SocketAddr)> {
        let (stream, addr) = self.listener.accept()?;
        stream.set_nodelay(true)?;
        log::info!("monitor connected: {}", addr);
        Ok((stream, addr))
    }
}

/// Write half of the monitor connection.
///
/// Only replaced at accept ([`MonitorLink::attach`]) and close
/// ([`MonitorLink::detach`]); a failed write also detaches.
#[derive(Default)]
pub struct MonitorLink {
    writer: Option<Box<dyn Write + Send>>,
}

impl MonitorLink {
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attach<W: Write + Send + 'static>(&mut self, writer: W) {
        self.writer = Some(Box::new(writer));
    }

    pub fn detach(&mut self) {
        if self.writer.take().is_some() {
            log::info!("monitor detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.writer.is_some()
    }

    pub fn emit(&mut self, event: &MonitorEvent) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };

        let line = match event.to_line() {
            Ok(line) => line,
            Err(e) => {
                log::warn!("cannot serialize monitor event: {}", e);
                return;
            }
        };

        let written = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush());
        if let Err(e) = written {
            log::warn!("monitor write failed, detaching: {}", e);
            self.writer = None;
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.emit(&MonitorEvent::info(text));
    }
}

impl ProgressSink for MonitorLink {
    fn progress(&mut self, event: ProgressEvent) {
        self.emit(&MonitorEvent::from(event));
    }
}
