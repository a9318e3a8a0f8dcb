//! Line Stream
//!
//! Buffered line/body framing over one duplex byte stream.

use std::io::{self, BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::error::{BeanstalkError, Result};

/// A duplex byte stream the client can own and close
pub trait Duplex: Read + Write {
    /// Close the underlying transport
    fn close(&mut self) -> io::Result<()>;
}

impl Duplex for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            // Peer already hung up; the socket is closed either way
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

#[cfg(unix)]
impl Duplex for std::os::unix::net::UnixStream {
    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl<T: Duplex + ?Sized> Duplex for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Reads CRLF lines and sized bodies, writes whole frames
///
/// Reads go through one `BufReader`; writes go straight to the inner
/// stream since every frame is assembled before it is sent.
pub struct LineStream<S: Duplex> {
    /// Buffered stream (writes bypass the buffer via `get_mut`)
    inner: BufReader<S>,

    /// Longest line accepted, CRLF included
    max_line_len: usize,
}

impl<S: Duplex> LineStream<S> {
    pub fn new(stream: S, max_line_len: usize) -> Self {
        Self {
            inner: BufReader::new(stream),
            max_line_len,
        }
    }

    /// Write a fully encoded frame and flush it
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let stream = self.inner.get_mut();
        stream.write_all(frame)?;
        stream.flush()?;
        Ok(())
    }

    /// Write `fields` space-joined and terminated by CRLF
    pub fn write_line(&mut self, fields: &[&str]) -> Result<()> {
        let mut line = fields.join(" ").into_bytes();
        line.extend_from_slice(b"\r\n");
        self.write_frame(&line)
    }

    /// Read the next CRLF-terminated line, terminator stripped
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();

        loop {
            let (found, used) = {
                let available = self.inner.fill_buf()?;
                if available.is_empty() {
                    return Err(BeanstalkError::Transport(io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "connection closed while reading a line",
                    )));
                }

                match available.iter().position(|&b| b == b'\n') {
                    Some(pos) => {
                        line.extend_from_slice(&available[..=pos]);
                        (true, pos + 1)
                    }
                    None => {
                        line.extend_from_slice(available);
                        (false, available.len())
                    }
                }
            };
            self.inner.consume(used);

            if line.len() > self.max_line_len {
                return Err(BeanstalkError::Protocol(format!(
                    "Line exceeds {} bytes without a terminator",
                    self.max_line_len
                )));
            }
            if found {
                break;
            }
        }

        if !line.ends_with(b"\r\n") {
            return Err(BeanstalkError::Protocol(
                "Line terminated by LF without CR".to_string(),
            ));
        }
        line.truncate(line.len() - 2);

        String::from_utf8(line)
            .map_err(|_| BeanstalkError::Protocol("Line is not valid UTF-8".to_string()))
    }

    /// Read exactly `n` body bytes, then consume the CRLF that follows
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let framed = n.checked_add(2).ok_or_else(|| {
            BeanstalkError::Protocol(format!("Body length {} overflows", n))
        })?;
        let mut body = vec![0u8; framed];
        self.inner.read_exact(&mut body)?;

        if &body[n..] != b"\r\n" {
            return Err(BeanstalkError::Protocol(format!(
                "Body of {} bytes is not followed by CRLF",
                n
            )));
        }
        body.truncate(n);

        Ok(body)
    }

    /// Close the underlying stream
    pub fn close(mut self) -> Result<()> {
        self.inner.get_mut().close()?;
        Ok(())
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        self.inner.get_ref()
    }
}
