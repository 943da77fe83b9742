//! Server Responder
//!
//! Menggunakan mio hanya untuk readiness listener; setiap koneksi dilayani
//! secara blocking sampai selesai sebelum accept berikutnya.
//!
//! Per connection: `AwaitFrame → HaveMessage → SendReply → Closed`.
//! Exactly one exchange, then the connection is dropped.

use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use mio::net::TcpListener as MioTcpListener;
use mio::{Events, Interest, Poll, Token};

use super::Connection;
use crate::config::ServerConfig;
use crate::core::{envelope, peel};
use crate::error::{ExchangeError, FrameError};
use crate::protocol::PacketMessage;

const SERVER_TOKEN: Token = Token(0);
const EVENTS_CAPACITY: usize = 16;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Server statistics
#[derive(Debug, Default)]
pub struct ResponderStats {
    pub connections: AtomicU64,
    pub exchanges: AtomicU64,
    pub dropped: AtomicU64,
    pub bytes_in: AtomicU64,
    pub bytes_out: AtomicU64,
}

impl ResponderStats {
    fn log_summary(&self) {
        log::info!(
            "stats: connections={} exchanges={} dropped={} bytes_in={} bytes_out={}",
            self.connections.load(Ordering::Relaxed),
            self.exchanges.load(Ordering::Relaxed),
            self.dropped.load(Ordering::Relaxed),
            self.bytes_in.load(Ordering::Relaxed),
            self.bytes_out.load(Ordering::Relaxed),
        );
    }
}

pub struct Responder {
    poll: Poll,
    listener: MioTcpListener,
    max_frame_size: usize,
    stats: ResponderStats,
}

impl Responder {
    pub fn bind(config: &ServerConfig) -> io::Result<Self> {
        let poll = Poll::new()?;

        let listener = TcpListener::bind(&config.bind_addr)?;
        listener.set_nonblocking(true)?;
        let mut listener = MioTcpListener::from_std(listener);

        poll.registry()
            .register(&mut listener, SERVER_TOKEN, Interest::READABLE)?;

        Ok(Self {
            poll,
            listener,
            max_frame_size: config.max_frame_size,
            stats: ResponderStats::default(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn stats(&self) -> &ResponderStats {
        &self.stats
    }

    /// Serve forever.
    pub fn run(&mut self) -> io::Result<()> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Serve until `stop` is set. The flag is checked between polls, so a
    /// connection in progress is always finished first.
    pub fn run_until(&mut self, stop: &AtomicBool) -> io::Result<()> {
        let mut events = Events::with_capacity(EVENTS_CAPACITY);
        log::info!("server listening on {}", self.local_addr()?);

        while !stop.load(Ordering::Relaxed) {
            match self.poll.poll(&mut events, Some(POLL_TIMEOUT)) {
                Ok(()) => {}
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }

            for event in events.iter() {
                if event.token() == SERVER_TOKEN {
                    self.accept_connections();
                }
            }
        }

        log::info!("server stopped");
        Ok(())
    }

    /// Drain the accept queue, serving each connection to completion.
    fn accept_connections(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((stream, addr)) => self.serve(stream.into(), addr),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    log::warn!("accept error: {}", e);
                    break;
                }
            }
        }
    }

    fn serve(&mut self, stream: std::net::TcpStream, addr: SocketAddr) {
        self.stats.connections.fetch_add(1, Ordering::Relaxed);
        log::info!("client connected: {}", addr);

        let mut conn = match Connection::new(stream, self.max_frame_size) {
            Ok(conn) => conn,
            Err(e) => {
                log::warn!("failed to set up {}: {}", addr, e);
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        match respond(&mut conn) {
            Ok(reply) => {
                self.stats.exchanges.fetch_add(1, Ordering::Relaxed);
                log::info!("reply sent to {}: {:?}", addr, reply.payload);
            }
            Err(ExchangeError::Frame(FrameError::ConnectionClosed)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                log::info!("{} closed without sending a frame", addr);
            }
            Err(e) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                log::warn!("exchange with {} aborted: {}", addr, e);
            }
        }

        self.stats
            .bytes_in
            .fetch_add(conn.bytes_received(), Ordering::Relaxed);
        self.stats
            .bytes_out
            .fetch_add(conn.bytes_sent(), Ordering::Relaxed);
        self.stats.log_summary();
    }
}

/// One request/reply exchange on an accepted connection.
///
/// Any receive failure returns before a reply is attempted. A malformed body
/// is not a failure: it is answered with an empty payload.
pub fn respond(conn: &mut Connection) -> Result<PacketMessage, ExchangeError> {
    let body = conn.recv()?;
    log::debug!("received packet JSON: {}", String::from_utf8_lossy(&body));

    let request = PacketMessage::from_json_lossy(&body);
    log::info!("payload: {:?}", request.payload);

    let wire = envelope(&request.payload);
    for (layer, inner) in peel(&wire) {
        log::debug!("[{} (RX)] {}", layer.name, inner);
    }

    let reply = request.acknowledge();
    conn.send_packet(&reply)?;
    Ok(reply)
}
