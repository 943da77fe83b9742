//! Session Orchestrator (client side)
//!
//! Owns the server link and the monitor link. Each monitor line is handled
//! to completion (TX → round trip → RX) before the next one is read, so the
//! events of two commands never interleave.

use std::io::{self, BufRead, BufReader, Read};
use std::net::TcpStream;
use std::thread::{self, JoinHandle};

use super::{Connection, MonitorLink};
use crate::config::ClientConfig;
use crate::core::{Decapsulator, Encapsulator};
use crate::error::ExchangeError;
use crate::protocol::{MonitorCommand, MonitorEvent, PacketMessage};

/// Longest monitor line accepted, newline included.
pub const MAX_LINE_LEN: usize = 2048;

pub struct Session {
    config: ClientConfig,
    /// `None` once the server has closed its side after an exchange.
    server: Option<Connection>,
    monitor: MonitorLink,
    encapsulator: Encapsulator,
    decapsulator: Decapsulator,
}

impl Session {
    /// Session with an already established server connection (or none yet).
    pub fn new(config: ClientConfig, server: Option<Connection>) -> Self {
        Self {
            encapsulator: Encapsulator::new(config.stage_delay),
            decapsulator: Decapsulator::new(config.stage_delay),
            config,
            server,
            monitor: MonitorLink::detached(),
        }
    }

    /// Connect to the server up front; fails if it is not reachable.
    pub fn connect(config: ClientConfig) -> Result<Self, ExchangeError> {
        let conn = Connection::connect(&config.server_addr, config.max_frame_size)
            .map_err(ExchangeError::Connect)?;
        log::info!("connected to server {}", conn.peer());
        Ok(Self::new(config, Some(conn)))
    }

    pub fn monitor(&self) -> &MonitorLink {
        &self.monitor
    }

    /// Install the monitor writer and greet it.
    pub fn attach_monitor(&mut self, stream: TcpStream) {
        self.monitor.attach(stream);
        self.monitor.info("Client monitor connected");
    }

    /// Attach `stream` as the monitor and run its command loop on a
    /// dedicated thread that owns the session.
    pub fn spawn(mut self, stream: TcpStream) -> io::Result<JoinHandle<io::Result<()>>> {
        let reader = BufReader::new(stream.try_clone()?);
        self.attach_monitor(stream);
        thread::Builder::new()
            .name("monitor".to_string())
            .spawn(move || self.serve_monitor(reader))
    }

    /// Read command lines until the monitor closes, then detach it. A reset
    /// counts as a close. Over-long lines are skipped with an info event.
    pub fn serve_monitor<R: BufRead>(&mut self, mut reader: R) -> io::Result<()> {
        let mut buf = Vec::with_capacity(MAX_LINE_LEN);
        let result = loop {
            buf.clear();
            let read = reader
                .by_ref()
                .take(MAX_LINE_LEN as u64)
                .read_until(b'\n', &mut buf);
            match read {
                Ok(0) => break Ok(()),
                Ok(n) if n == MAX_LINE_LEN && buf.last() != Some(&b'\n') => {
                    log::warn!("monitor line exceeds {} bytes, skipped", MAX_LINE_LEN);
                    self.monitor
                        .info(format!("Line too long (limit {} bytes)", MAX_LINE_LEN));
                    if let Err(e) = skip_line(&mut reader) {
                        break Err(e);
                    }
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    self.handle_line(&line);
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => break Err(e),
            }
        };

        let result = match result {
            Err(e) if is_disconnect(&e) => {
                log::warn!("monitor connection dropped: {}", e);
                Ok(())
            }
            other => other,
        };

        log::info!("monitor connection closed");
        self.monitor.detach();
        result
    }

    /// Dispatch one raw monitor line.
    pub fn handle_line(&mut self, line: &str) {
        match MonitorCommand::parse(line) {
            None => {}
            Some(MonitorCommand::Send(payload)) => {
                log::info!("SEND {:?}", payload);
                if let Err(e) = self.send(&payload) {
                    log::error!("send failed: {}", e);
                    self.monitor.info(format!("Send failed: {}", e));
                }
            }
            Some(MonitorCommand::Unknown(line)) => {
                log::warn!("unknown monitor command: {:?}", line);
                self.monitor.info(format!("Unknown command: {}", line));
            }
        }
    }

    /// Full pipeline for one payload. On failure nothing after the failing
    /// step runs; events already emitted stand.
    pub fn send(&mut self, payload: &str) -> Result<PacketMessage, ExchangeError> {
        let packet = self.encapsulator.run(payload, &mut self.monitor);

        let result = self.round_trip(&packet);
        // Server closes after every exchange; next command gets a fresh link.
        if let Some(conn) = self.server.take() {
            log::debug!(
                "server link to {} spent ({} frames out, {} in)",
                conn.peer(),
                conn.frames_sent(),
                conn.frames_received()
            );
        }
        let reply = result?;
        log::info!("reply: {:?}", reply.payload);

        self.decapsulator.run(&mut self.monitor);
        if self.config.echo_reply {
            self.monitor.emit(&MonitorEvent::packet(&reply));
        }
        Ok(reply)
    }

    fn round_trip(&mut self, packet: &PacketMessage) -> Result<PacketMessage, ExchangeError> {
        let conn = self.server_link()?;
        conn.send_packet(packet)?;
        let body = conn.recv()?;
        Ok(PacketMessage::from_json_lossy(&body))
    }

    fn server_link(&mut self) -> Result<&mut Connection, ExchangeError> {
        let conn = match self.server.take() {
            Some(conn) => conn,
            None => {
                let conn =
                    Connection::connect(&self.config.server_addr, self.config.max_frame_size)
                        .map_err(ExchangeError::Connect)?;
                log::info!("reconnected to server {}", conn.peer());
                conn
            }
        };
        Ok(self.server.insert(conn))
    }
}

/// Discard input up to and including the next `\n` (or EOF).
fn skip_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let (done, used) = match reader.fill_buf() {
            Ok([]) => return Ok(()),
            Ok(chunk) => match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => (true, pos + 1),
                None => (false, chunk.len()),
            },
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}
