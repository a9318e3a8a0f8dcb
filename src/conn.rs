//! Connection Module
//!
//! `Conn` owns one stream to the server and exposes one method per verb.
//!
//! ## Concurrency Model
//!
//! Strictly request-then-response: every method writes one command and
//! blocks until its whole reply is read. Methods take `&mut self`, so a
//! connection has at most one command in flight. Share one across threads
//! by wrapping it in a mutex, or give each worker its own.
//!
//! ## Failure Model
//!
//! - `Command` errors (NOT_FOUND, TIMED_OUT, ...) leave the connection usable
//! - `Transport`/`Protocol` errors leave the read position unknown; every
//!   later call fails with `Transport` until the connection is dropped
//! - `close` shuts the stream; later calls fail with `Transport`

use std::io::{self, ErrorKind};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::Config;
use crate::error::{BeanstalkError, Result};
use crate::network::{tcp_dial, Duplex, LineStream};
use crate::protocol::{encode_command, parse_list, parse_stats, read_reply, Command, Reply, Stats};
use crate::tube::{validate_name, Tube, TubeSet};

/// Tube every new connection uses and watches
pub const DEFAULT_TUBE: &str = "default";

/// A job handed back by reserve or peek
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u64,
    pub body: Vec<u8>,
}

impl Job {
    fn from_reply(reply: Reply) -> Result<Self> {
        let id = reply.num(0)?;
        Ok(Self {
            id,
            body: reply.into_body(),
        })
    }
}

/// A client connection to a beanstalkd server
pub struct Conn<S: Duplex = TcpStream> {
    /// `None` once closed
    stream: Option<LineStream<S>>,

    /// Set after a transport or protocol failure
    desynced: bool,

    /// Tube the server currently puts into for this connection
    used: String,

    /// Tubes the server currently reserves from for this connection
    watched: Vec<String>,

    config: Config,
}

impl Conn<TcpStream> {
    /// Connect over TCP to `config.addr`
    pub fn connect(config: Config) -> Result<Self> {
        let dial_config = config.clone();
        Self::connect_with(
            |network, addr| tcp_dial(network, addr, &dial_config),
            config,
        )
    }
}

impl<S: Duplex> Conn<S> {
    /// Connect using a caller-supplied dial function `(network, addr) -> stream`
    pub fn connect_with<F>(dial: F, config: Config) -> Result<Self>
    where
        F: FnOnce(&str, &str) -> io::Result<S>,
    {
        let stream = dial("tcp", &config.addr)?;
        Ok(Self::from_stream(stream, config))
    }

    /// Wrap an already-open stream
    pub fn from_stream(stream: S, config: Config) -> Self {
        Self {
            stream: Some(LineStream::new(stream, config.max_line_len)),
            desynced: false,
            used: DEFAULT_TUBE.to_string(),
            watched: vec![DEFAULT_TUBE.to_string()],
            config,
        }
    }

    // =========================================================================
    // Round Trip
    // =========================================================================

    /// Send one command and read its reply
    fn execute(&mut self, command: Command<'_>) -> Result<Reply> {
        if self.desynced {
            return Err(BeanstalkError::Transport(io::Error::new(
                ErrorKind::NotConnected,
                "connection is out of sync after an earlier failure",
            )));
        }
        let stream = self.stream.as_mut().ok_or_else(closed)?;

        tracing::trace!("-> {}", command.verb());
        let frame = encode_command(&command);
        let result = stream
            .write_frame(&frame)
            .and_then(|_| read_reply(stream, &command, self.config.max_body_size));

        if let Err(e) = &result {
            if e.is_fatal() {
                self.desynced = true;
            }
        }
        result
    }

    // =========================================================================
    // Producer
    // =========================================================================

    /// Put a job into the used tube; returns its id
    ///
    /// `BURIED` (server out of memory for its priority queue) comes back as
    /// a command error carrying the new job's id.
    pub fn put(&mut self, body: &[u8], pri: u32, delay: Duration, ttr: Duration) -> Result<u64> {
        let reply = self.execute(Command::Put {
            pri,
            delay: delay.as_secs(),
            ttr: ttr.as_secs(),
            body,
        })?;
        reply.num(0)
    }

    /// Switch the tube `put`, `peek_*` and `kick` act on
    pub fn use_tube(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        let reply = self.execute(Command::Use { tube: name })?;
        let using = reply.text(0)?;
        if using != name {
            self.desynced = true;
            return Err(BeanstalkError::Protocol(format!(
                "Asked to use {:?}, server is using {:?}",
                name, using
            )));
        }
        self.used = name.to_string();
        Ok(())
    }

    /// Name of the tube this connection uses
    pub fn used_tube(&self) -> &str {
        &self.used
    }

    /// `use` `name` unless it is already in use
    pub(crate) fn ensure_used(&mut self, name: &str) -> Result<()> {
        if self.used == name {
            return Ok(());
        }
        self.use_tube(name)
    }

    // =========================================================================
    // Worker
    // =========================================================================

    /// Reserve a job from the watched tubes
    ///
    /// `None` blocks until a job is ready; `Some` waits at most that many
    /// whole seconds and then fails with `TIMED_OUT`.
    pub fn reserve(&mut self, timeout: Option<Duration>) -> Result<Job> {
        let command = match timeout {
            Some(timeout) => Command::ReserveWithTimeout {
                seconds: timeout.as_secs(),
            },
            None => Command::Reserve,
        };
        Job::from_reply(self.execute(command)?)
    }

    /// Reserve a specific job by id
    pub fn reserve_job(&mut self, id: u64) -> Result<Job> {
        Job::from_reply(self.execute(Command::ReserveJob { id })?)
    }

    pub fn delete(&mut self, id: u64) -> Result<()> {
        self.execute(Command::Delete { id })?;
        Ok(())
    }

    /// Put a reserved job back into the ready queue (or delayed, if `delay` > 0)
    pub fn release(&mut self, id: u64, pri: u32, delay: Duration) -> Result<()> {
        self.execute(Command::Release {
            id,
            pri,
            delay: delay.as_secs(),
        })?;
        Ok(())
    }

    pub fn bury(&mut self, id: u64, pri: u32) -> Result<()> {
        self.execute(Command::Bury { id, pri })?;
        Ok(())
    }

    /// Ask for more time on a reserved job
    pub fn touch(&mut self, id: u64) -> Result<()> {
        self.execute(Command::Touch { id })?;
        Ok(())
    }

    /// Add `name` to the watch list; returns the number of watched tubes
    pub fn watch(&mut self, name: &str) -> Result<u64> {
        validate_name(name)?;
        let count = self.execute(Command::Watch { tube: name })?.num(0)?;
        if !self.watched.iter().any(|w| w == name) {
            self.watched.push(name.to_string());
        }
        Ok(count)
    }

    /// Drop `name` from the watch list; returns the number of watched tubes
    pub fn ignore(&mut self, name: &str) -> Result<u64> {
        validate_name(name)?;
        let count = self.execute(Command::Ignore { tube: name })?.num(0)?;
        self.watched.retain(|w| w != name);
        Ok(count)
    }

    /// Tubes this connection watches, as last synchronized
    pub fn watched_tubes(&self) -> &[String] {
        &self.watched
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn peek(&mut self, id: u64) -> Result<Job> {
        Job::from_reply(self.execute(Command::Peek { id })?)
    }

    /// Next ready job in the used tube
    pub fn peek_ready(&mut self) -> Result<Job> {
        Job::from_reply(self.execute(Command::PeekReady)?)
    }

    /// Delayed job with the shortest delay left in the used tube
    pub fn peek_delayed(&mut self) -> Result<Job> {
        Job::from_reply(self.execute(Command::PeekDelayed)?)
    }

    /// Next buried job in the used tube
    pub fn peek_buried(&mut self) -> Result<Job> {
        Job::from_reply(self.execute(Command::PeekBuried)?)
    }

    pub fn stats_job(&mut self, id: u64) -> Result<Stats> {
        parse_stats(&self.execute(Command::StatsJob { id })?.into_body())
    }

    pub fn stats_tube(&mut self, name: &str) -> Result<Stats> {
        validate_name(name)?;
        parse_stats(&self.execute(Command::StatsTube { tube: name })?.into_body())
    }

    /// Server-wide statistics
    pub fn stats(&mut self) -> Result<Stats> {
        parse_stats(&self.execute(Command::Stats)?.into_body())
    }

    pub fn list_tubes(&mut self) -> Result<Vec<String>> {
        parse_list(&self.execute(Command::ListTubes)?.into_body())
    }

    /// Ask the server which tube this connection uses
    pub fn list_tube_used(&mut self) -> Result<String> {
        let reply = self.execute(Command::ListTubeUsed)?;
        Ok(reply.text(0)?.to_string())
    }

    pub fn list_tubes_watched(&mut self) -> Result<Vec<String>> {
        parse_list(&self.execute(Command::ListTubesWatched)?.into_body())
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Move up to `bound` buried (or, if none, delayed) jobs in the used
    /// tube back to ready; returns how many moved
    pub fn kick(&mut self, bound: u64) -> Result<u64> {
        self.execute(Command::Kick { bound })?.num(0)
    }

    /// Kick one buried or delayed job by id
    pub fn kick_job(&mut self, id: u64) -> Result<()> {
        self.execute(Command::KickJob { id })?;
        Ok(())
    }

    /// Stop handing out jobs from `name` for `delay`
    pub fn pause_tube(&mut self, name: &str, delay: Duration) -> Result<()> {
        validate_name(name)?;
        self.execute(Command::PauseTube {
            tube: name,
            seconds: delay.as_secs(),
        })?;
        Ok(())
    }

    // =========================================================================
    // Scoping
    // =========================================================================

    /// Handle for operations scoped to one tube
    pub fn tube(&mut self, name: &str) -> Result<Tube<'_, S>> {
        Tube::new(self, name)
    }

    /// Handle for reserving from exactly the tubes in `names`
    pub fn tube_set(&mut self, names: &[&str]) -> Result<TubeSet<'_, S>> {
        TubeSet::new(self, names)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the underlying stream. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.stream.take() {
            Some(stream) => stream.close(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// The underlying stream, while open
    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref().map(LineStream::get_ref)
    }
}

fn closed() -> BeanstalkError {
    BeanstalkError::Transport(io::Error::new(
        ErrorKind::NotConnected,
        "connection is closed",
    ))
}
