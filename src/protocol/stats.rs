//! Stats body parsing
//!
//! Stats and list replies carry a small YAML subset:
//!
//! ```text
//! ---
//! current-jobs-ready: 3
//! name: default
//! ```
//!
//! or, for tube lists,
//!
//! ```text
//! ---
//! - default
//! - emails
//! ```
//!
//! Values are kept as text; the key set depends on the server version.

use std::time::Duration;

use crate::error::{BeanstalkError, Result};

const DOCUMENT_MARKER: &str = "---";

/// Ordered string-to-string mapping parsed from a stats body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    entries: Vec<(String, String)>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; a repeated key keeps its position and takes the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in the order the server sent them
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Read `key` as an unsigned integer
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        self.get(key)
            .map(|v| {
                v.parse().map_err(|_| {
                    BeanstalkError::Parse(format!("{}: {:?} is not an unsigned integer", key, v))
                })
            })
            .transpose()
    }

    /// Read `key` as a whole number of seconds
    pub fn get_duration(&self, key: &str) -> Result<Option<Duration>> {
        Ok(self.get_u64(key)?.map(Duration::from_secs))
    }
}

impl<'a> IntoIterator for &'a Stats {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Parse a `key: value` body into a [`Stats`] mapping
pub fn parse_stats(body: &[u8]) -> Result<Stats> {
    let text = body_text(body)?;
    let mut stats = Stats::new();

    for line in document_lines(text) {
        let (key, value) = line.split_once(": ").ok_or_else(|| {
            BeanstalkError::Parse(format!("Stats line has no ': ' separator: {:?}", line))
        })?;
        stats.insert(key.trim_start(), value);
    }

    Ok(stats)
}

/// Parse a `- item` list body
pub fn parse_list(body: &[u8]) -> Result<Vec<String>> {
    let text = body_text(body)?;

    document_lines(text)
        .map(|line| {
            line.trim_start()
                .strip_prefix("- ")
                .map(str::to_string)
                .ok_or_else(|| {
                    BeanstalkError::Parse(format!("List line has no '- ' prefix: {:?}", line))
                })
        })
        .collect()
}

fn body_text(body: &[u8]) -> Result<&str> {
    std::str::from_utf8(body)
        .map_err(|_| BeanstalkError::Parse("Body is not valid UTF-8".to_string()))
}

/// Non-empty lines after the document marker
fn document_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut lines = text.lines().peekable();
    if lines.peek().map(|l| l.trim_end()) == Some(DOCUMENT_MARKER) {
        lines.next();
    }
    lines.filter(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_only() {
        assert!(parse_stats(b"---\n").unwrap().is_empty());
        assert!(parse_list(b"---\n").unwrap().is_empty());
    }

    #[test]
    fn test_value_keeps_colons() {
        let stats = parse_stats(b"---\nhostname: a: b\n").unwrap();
        assert_eq!(stats.get("hostname"), Some("a: b"));
    }
}
