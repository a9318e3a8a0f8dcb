//! Protocol codec
//!
//! Encodes commands into wire frames.
//!
//! ## Wire Format
//!
//! ```text
//! verb SP arg1 SP arg2 ... CRLF
//! [body CRLF]                      (put only; length is the last arg)
//! ```

use bytes::{BufMut, BytesMut};

use super::{Arg, Command};

/// Encode a command into one contiguous frame
pub fn encode_command(command: &Command<'_>) -> BytesMut {
    let args = command.args();
    let body = command.body();

    let mut frame = BytesMut::with_capacity(
        command.verb().len() + args.len() * 8 + body.map_or(0, |b| b.len() + 2) + 2,
    );

    frame.put_slice(command.verb().as_bytes());
    for arg in &args {
        frame.put_u8(b' ');
        match arg {
            Arg::Num(n) => frame.put_slice(n.to_string().as_bytes()),
            Arg::Token(token) => frame.put_slice(token.as_bytes()),
        }
    }
    frame.put_slice(b"\r\n");

    if let Some(body) = body {
        frame.put_slice(body);
        frame.put_slice(b"\r\n");
    }

    frame
}
