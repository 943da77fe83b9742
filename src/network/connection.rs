//! Framed connection over a blocking `TcpStream`
//!
//! Satu frame per `send`/`recv`. Frame bound is fixed at construction.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use crate::error::{ExchangeError, Result};
use crate::protocol::{read_frame, write_frame, PacketMessage};

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    max_frame_size: usize,
    frames_sent: u64,
    frames_received: u64,
    bytes_sent: u64,
    bytes_received: u64,
}

impl Connection {
    /// Connect to `addr` (blocking).
    pub fn connect<A: ToSocketAddrs>(addr: A, max_frame_size: usize) -> io::Result<Self> {
        Self::new(TcpStream::connect(addr)?, max_frame_size)
    }

    /// Wrap an accepted or connected stream.
    pub fn new(stream: TcpStream, max_frame_size: usize) -> io::Result<Self> {
        stream.set_nonblocking(false)?;
        // Disable Nagle: setiap frame kecil dan latency-sensitive
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;

        Ok(Self {
            stream,
            peer,
            max_frame_size,
            frames_sent: 0,
            frames_received: 0,
            bytes_sent: 0,
            bytes_received: 0,
        })
    }

    pub fn send(&mut self, body: &[u8]) -> Result<()> {
        write_frame(&mut self.stream, body)?;
        self.frames_sent += 1;
        self.bytes_sent += body.len() as u64;
        log::debug!("-> {} frame of {} bytes", self.peer, body.len());
        Ok(())
    }

    pub fn recv(&mut self) -> Result<Vec<u8>> {
        let body = read_frame(&mut self.stream, self.max_frame_size)?;
        self.frames_received += 1;
        self.bytes_received += body.len() as u64;
        log::debug!("<- {} frame of {} bytes", self.peer, body.len());
        Ok(body)
    }

    pub fn send_packet(&mut self, msg: &PacketMessage) -> std::result::Result<(), ExchangeError> {
        let body = msg.to_json()?;
        self.send(&body)?;
        Ok(())
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }
}
