//! Shared test fixtures
//!
//! `MockStream` replays a fixed reply and records every byte written.
//! Closing it fails unless the written bytes equal the expected request,
//! so `conn.close()` doubles as a check on what went over the wire.

#![allow(dead_code)]

use std::io::{self, Cursor, ErrorKind, Read, Write};
use std::sync::{Arc, Mutex};

use beanstalk::{Config, Conn, Duplex};

pub struct MockStream {
    expected: Vec<u8>,
    written: Arc<Mutex<Vec<u8>>>,
    reply: Cursor<Vec<u8>>,
}

impl MockStream {
    pub fn new(expected: &[u8], reply: &[u8]) -> Self {
        Self {
            expected: expected.to_vec(),
            written: Arc::new(Mutex::new(Vec::new())),
            reply: Cursor::new(reply.to_vec()),
        }
    }

    /// Handle on the bytes written so far
    pub fn written(&self) -> Arc<Mutex<Vec<u8>>> {
        Arc::clone(&self.written)
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reply.read(buf)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Duplex for MockStream {
    fn close(&mut self) -> io::Result<()> {
        let written = self.written.lock().unwrap();
        if *written != self.expected {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "expected request {:?}, got {:?}",
                    String::from_utf8_lossy(&self.expected),
                    String::from_utf8_lossy(&written)
                ),
            ));
        }
        Ok(())
    }
}

/// A stream whose writes always fail
pub struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(ErrorKind::ConnectionReset, "reset"))
    }
}

impl Write for BrokenStream {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(ErrorKind::BrokenPipe, "broken pipe"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Duplex for BrokenStream {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Connect through a dial function that hands out a scripted mock
pub fn mock_conn(request: &str, reply: &str) -> Conn<MockStream> {
    let stream = MockStream::new(request.as_bytes(), reply.as_bytes());
    Conn::connect_with(move |_network, _addr| Ok(stream), Config::default()).unwrap()
}
