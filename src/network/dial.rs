//! TCP Dialer
//!
//! Default dial collaborator used by `Conn::connect`.

use std::io::{self, ErrorKind};
use std::net::{TcpStream, ToSocketAddrs};

use crate::config::Config;

/// Open a TCP stream to `addr`, applying the config's socket timeouts
pub fn tcp_dial(network: &str, addr: &str, config: &Config) -> io::Result<TcpStream> {
    match network {
        "tcp" | "tcp4" | "tcp6" => {}
        other => {
            return Err(io::Error::new(
                ErrorKind::Unsupported,
                format!("unsupported network {:?}", other),
            ))
        }
    }

    tracing::debug!("Dialing {} {}", network, addr);

    let stream = match config.connect_timeout() {
        Some(timeout) => connect_with_timeout(addr, timeout)?,
        None => TcpStream::connect(addr)?,
    };

    // Request/response traffic; don't let Nagle hold back small commands
    stream.set_nodelay(true)?;
    stream.set_read_timeout(config.read_timeout())?;
    stream.set_write_timeout(config.write_timeout())?;

    Ok(stream)
}

fn connect_with_timeout(addr: &str, timeout: std::time::Duration) -> io::Result<TcpStream> {
    let mut last_err = None;

    for sock_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&sock_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} did not resolve to any address", addr),
        )
    }))
}
