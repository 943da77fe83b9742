//! Length-Prefixed Framing
//!
//! Layout:
//! ┌──────────────────────────┬──────────────────────────────┐
//! │ length (u32, big-endian) │ body (exactly `length` bytes) │
//! └──────────────────────────┴──────────────────────────────┘
//!
//! Symmetric: client dan server pakai fungsi yang sama. Generic over
//! `Read`/`Write` so any byte stream (TCP, in-memory cursor) can carry frames.

use std::io::{self, Read, Write};

use crate::error::{FrameError, Result};

pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Encode a frame into a fresh buffer (header + body).
pub fn encode_frame(body: &[u8]) -> Result<Vec<u8>> {
    let len = prefix_for(body)?;
    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + body.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(body);
    Ok(buf)
}

/// Write one frame. A short or failed write is a connection-level error.
pub fn write_frame<W: Write>(writer: &mut W, body: &[u8]) -> Result<()> {
    let len = prefix_for(body)?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(body)?;
    writer.flush()?;
    Ok(())
}

/// Read one frame whose body must be strictly smaller than `max_size`.
///
/// - EOF before any header byte → [`FrameError::ConnectionClosed`]
/// - read error before any header byte → [`FrameError::Io`]
/// - EOF or read error inside the header or body → [`FrameError::Protocol`]
/// - declared length `>= max_size` → [`FrameError::TooLarge`], body untouched
pub fn read_frame<R: Read>(reader: &mut R, max_size: usize) -> Result<Vec<u8>> {
    let mut header = [0u8; LENGTH_PREFIX_SIZE];

    match read_full(reader, &mut header) {
        (LENGTH_PREFIX_SIZE, _) => {}
        (0, Ok(())) => return Err(FrameError::ConnectionClosed),
        (0, Err(e)) => return Err(FrameError::Io(e)),
        (n, Ok(())) => {
            return Err(FrameError::Protocol(format!(
                "truncated header: got {} of {} bytes",
                n, LENGTH_PREFIX_SIZE
            )))
        }
        (n, Err(e)) => {
            return Err(FrameError::Protocol(format!(
                "truncated header: got {} of {} bytes ({})",
                n, LENGTH_PREFIX_SIZE, e
            )))
        }
    }

    let len = u32::from_be_bytes(header) as usize;
    if len >= max_size {
        return Err(FrameError::TooLarge { len, max: max_size });
    }

    let mut body = vec![0u8; len];
    match read_full(reader, &mut body) {
        (n, Ok(())) if n == len => Ok(body),
        (n, Ok(())) => Err(FrameError::Protocol(format!(
            "truncated body: got {} of {} bytes",
            n, len
        ))),
        (n, Err(e)) => Err(FrameError::Protocol(format!(
            "body read failed after {} of {} bytes: {}",
            n, len, e
        ))),
    }
}

fn prefix_for(body: &[u8]) -> Result<u32> {
    u32::try_from(body.len()).map_err(|_| FrameError::TooLarge {
        len: body.len(),
        max: u32::MAX as usize,
    })
}

/// Fill `buf` sampai penuh, EOF, atau error. Returns the bytes read so far
/// alongside the error (if any) that stopped the read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> (usize, io::Result<()>) {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return (filled, Err(e)),
        }
    }
    (filled, Ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MAX: usize = 8192;

    /// Reader yang hanya mengembalikan satu byte per `read`.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    /// Reader that yields its bytes, then fails with `ConnectionReset`.
    struct ResetAfter<'a>(&'a [u8]);

    impl Read for ResetAfter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            let n = buf.len().min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    /// Writer that accepts a fixed number of bytes, then fails.
    struct Budget(usize);

    impl Write for Budget {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.0 == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
            }
            let n = buf.len().min(self.0);
            self.0 -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_header_is_big_endian() {
        let mut out = Vec::new();
        write_frame(&mut out, b"abc").unwrap();
        assert_eq!(out, [0, 0, 0, 3, b'a', b'b', b'c']);
        assert_eq!(encode_frame(b"abc").unwrap(), out);
    }

    #[test]
    fn test_payloads_survive_framing() {
        let payloads: [&[u8]; 4] = [
            b"",
            b"Hello",
            br#"{"payload":"a \"quoted\" \\ value"}"#,
            "ünïcödé \n line".as_bytes(),
        ];

        let mut wire = Vec::new();
        for p in payloads {
            write_frame(&mut wire, p).unwrap();
        }

        let mut reader = Cursor::new(wire);
        for p in payloads {
            assert_eq!(read_frame(&mut reader, MAX).unwrap(), p);
        }
        assert!(matches!(
            read_frame(&mut reader, MAX),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_empty_stream_is_clean_close() {
        let mut reader = Cursor::new(Vec::new());
        assert!(matches!(
            read_frame(&mut reader, MAX),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_truncated_header() {
        let mut reader = Cursor::new(vec![0u8, 0]);
        assert!(matches!(
            read_frame(&mut reader, MAX),
            Err(FrameError::Protocol(_))
        ));
    }

    #[test]
    fn test_reset_inside_header_is_protocol_error() {
        let mut reader = ResetAfter(&[0, 0]);
        match read_frame(&mut reader, MAX) {
            Err(FrameError::Protocol(msg)) => assert!(msg.contains("2 of 4"), "{}", msg),
            other => panic!("expected Protocol, got {:?}", other),
        }
    }

    #[test]
    fn test_reset_before_header_is_io_error() {
        let mut reader = ResetAfter(&[]);
        assert!(matches!(
            read_frame(&mut reader, MAX),
            Err(FrameError::Io(ref e)) if e.kind() == io::ErrorKind::ConnectionReset
        ));
    }

    #[test]
    fn test_reset_inside_body_is_protocol_error() {
        let mut reader = ResetAfter(&[0, 0, 0, 5, b'a', b'b']);
        assert!(matches!(
            read_frame(&mut reader, MAX),
            Err(FrameError::Protocol(_))
        ));
    }

    #[test]
    fn test_truncated_body() {
        let mut reader = Cursor::new(vec![0, 0, 0, 10, b'x', b'y']);
        assert!(matches!(
            read_frame(&mut reader, MAX),
            Err(FrameError::Protocol(_))
        ));
    }

    #[test]
    fn test_oversized_frame_leaves_body_unread() {
        let mut wire = (MAX as u32).to_be_bytes().to_vec();
        wire.extend_from_slice(b"body");
        let mut reader = Cursor::new(wire);

        match read_frame(&mut reader, MAX) {
            Err(FrameError::TooLarge { len, max }) => {
                assert_eq!(len, MAX);
                assert_eq!(max, MAX);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
        assert_eq!(reader.position(), LENGTH_PREFIX_SIZE as u64);
    }

    #[test]
    fn test_largest_allowed_frame() {
        let body = vec![7u8; MAX - 1];
        let mut wire = Vec::new();
        write_frame(&mut wire, &body).unwrap();
        assert_eq!(read_frame(&mut Cursor::new(wire), MAX).unwrap(), body);
    }

    #[test]
    fn test_short_reads_are_accumulated() {
        let wire = encode_frame(b"fragmented").unwrap();
        let mut reader = Trickle(&wire);
        assert_eq!(read_frame(&mut reader, MAX).unwrap(), b"fragmented");
    }

    #[test]
    fn test_partial_write_is_io_error() {
        let mut writer = Budget(6);
        assert!(matches!(
            write_frame(&mut writer, b"Hello"),
            Err(FrameError::Io(_))
        ));
    }
}
