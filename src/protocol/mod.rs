//! Protocol Module
//!
//! The beanstalkd text protocol, client side.
//!
//! ## Request Format
//! ```text
//! verb [arg ...] CRLF
//! [body CRLF]
//! ```
//! Numeric args are decimal unsigned integers; tokens hold no spaces.
//!
//! ## Reply Format
//! ```text
//! WORD [field ...] CRLF
//! [body CRLF]
//! ```
//! When a body follows, the last field is its length in bytes. The
//! trailing CRLF is not counted.
//!
//! ### Reply Classes
//! - success word: the one word the command expects (`INSERTED`, `FOUND`, ...)
//! - error word: a word in the command's known vocabulary (`NOT_FOUND`, ...)
//! - anything else: the connection is out of sync

mod codec;
mod command;
mod response;
mod stats;

pub use codec::encode_command;
pub use command::{Arg, Command, Expect, UNIVERSAL_ERRORS};
pub use response::{classify, expect, expect_with_body, read_reply, Reply, StatusLine};
pub use stats::{parse_list, parse_stats, Stats};
