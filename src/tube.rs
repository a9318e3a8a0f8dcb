//! Tube Module
//!
//! Name-scoped views over a `Conn`.
//!
//! A `Tube` issues `use <name>` only when the connection is using some
//! other tube, so repeated calls on the same tube add no extra traffic.
//! A `TubeSet` brings the connection's watch list in line with its names
//! before reserving: new tubes are watched first, stale ones ignored after,
//! so the list is never empty in between.

use std::time::Duration;

use crate::conn::{Conn, Job};
use crate::error::{BeanstalkError, Result};
use crate::network::Duplex;
use crate::protocol::Stats;

/// Longest tube name the server accepts
pub const MAX_NAME_LEN: usize = 200;

/// Check a tube name against the server's naming rules
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('-')
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-+/;.$_()".contains(&b));

    if valid {
        Ok(())
    } else {
        Err(BeanstalkError::InvalidName(name.to_string()))
    }
}

/// Operations on one named tube
pub struct Tube<'c, S: Duplex> {
    conn: &'c mut Conn<S>,
    name: String,
}

impl<'c, S: Duplex> Tube<'c, S> {
    pub(crate) fn new(conn: &'c mut Conn<S>, name: &str) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            conn,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn put(&mut self, body: &[u8], pri: u32, delay: Duration, ttr: Duration) -> Result<u64> {
        self.conn.ensure_used(&self.name)?;
        self.conn.put(body, pri, delay, ttr)
    }

    pub fn peek_ready(&mut self) -> Result<Job> {
        self.conn.ensure_used(&self.name)?;
        self.conn.peek_ready()
    }

    pub fn peek_delayed(&mut self) -> Result<Job> {
        self.conn.ensure_used(&self.name)?;
        self.conn.peek_delayed()
    }

    pub fn peek_buried(&mut self) -> Result<Job> {
        self.conn.ensure_used(&self.name)?;
        self.conn.peek_buried()
    }

    pub fn kick(&mut self, bound: u64) -> Result<u64> {
        self.conn.ensure_used(&self.name)?;
        self.conn.kick(bound)
    }

    pub fn stats(&mut self) -> Result<Stats> {
        self.conn.stats_tube(&self.name)
    }

    pub fn pause(&mut self, delay: Duration) -> Result<()> {
        self.conn.pause_tube(&self.name, delay)
    }
}

/// Reserve from exactly a given set of tubes
pub struct TubeSet<'c, S: Duplex> {
    conn: &'c mut Conn<S>,
    names: Vec<String>,
}

impl<'c, S: Duplex> TubeSet<'c, S> {
    pub(crate) fn new(conn: &'c mut Conn<S>, names: &[&str]) -> Result<Self> {
        if names.is_empty() {
            return Err(BeanstalkError::InvalidName(String::new()));
        }
        for name in names {
            validate_name(name)?;
        }

        let mut owned: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !owned.iter().any(|n| n == name) {
                owned.push(name.to_string());
            }
        }

        Ok(Self { conn, names: owned })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sync the watch list, then reserve (see [`Conn::reserve`])
    pub fn reserve(&mut self, timeout: Option<Duration>) -> Result<Job> {
        self.sync_watched()?;
        self.conn.reserve(timeout)
    }

    fn sync_watched(&mut self) -> Result<()> {
        for name in &self.names {
            if !self.conn.watched_tubes().iter().any(|w| w == name) {
                self.conn.watch(name)?;
            }
        }

        let stale: Vec<String> = self
            .conn
            .watched_tubes()
            .iter()
            .filter(|w| !self.names.contains(*w))
            .cloned()
            .collect();
        for name in stale {
            self.conn.ignore(&name)?;
        }

        Ok(())
    }
}
