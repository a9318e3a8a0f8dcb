//! Network Module
//!
//! Byte-stream plumbing underneath the protocol.
//!
//! ## Architecture
//! - `Duplex`: any Read + Write stream the client can close
//! - `LineStream`: CRLF line reader, sized body reader, frame writer
//! - `tcp_dial`: default dial collaborator

mod dial;
mod stream;

pub use dial::tcp_dial;
pub use stream::{Duplex, LineStream};
