//! # beanstalk
//!
//! A synchronous client for the beanstalkd work queue:
//! - Put jobs into named tubes, reserve and finish them
//! - Peek, kick, bury and inspect jobs and tubes
//! - One blocking connection per client, no hidden reconnects
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Conn / Tube / TubeSet                        │
//! │             (one method per protocol verb)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐       ┌─────────────┐
//!   │    Codec    │          │  Response   │──────▶│    Stats    │
//!   │  (encode)   │          │  (decode)   │       │  (parse)    │
//!   └──────┬──────┘          └──────┬──────┘       └─────────────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────────────────────────────┐
//!   │      LineStream (CRLF framing)      │
//!   └──────────────────┬──────────────────┘
//!                      ▼
//!              Duplex byte stream
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use beanstalk::{Config, Conn};
//!
//! # fn main() -> beanstalk::Result<()> {
//! let mut conn = Conn::connect(Config::default())?;
//! let id = conn.tube("emails")?.put(b"hello", 1024, Duration::ZERO, Duration::from_secs(60))?;
//!
//! let job = conn.tube_set(&["emails"])?.reserve(Some(Duration::from_secs(5)))?;
//! assert_eq!(job.id, id);
//! conn.delete(job.id)?;
//! conn.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod network;
pub mod protocol;
pub mod conn;
pub mod tube;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BeanstalkError, CommandStatus, Result};
pub use config::Config;
pub use conn::{Conn, Job, DEFAULT_TUBE};
pub use network::Duplex;
pub use protocol::Stats;
pub use tube::{Tube, TubeSet};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
