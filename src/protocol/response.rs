//! Response decoding
//!
//! Reads a status line, checks it against the vocabulary of the command
//! that produced it, and pulls in any declared body.

use super::command::UNIVERSAL_ERRORS;
use super::{Command, Expect};
use crate::error::{BeanstalkError, CommandStatus, Result};
use crate::network::{Duplex, LineStream};

/// The first line of every reply, split on spaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub word: String,
    pub fields: Vec<String>,
}

impl StatusLine {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split(' ');
        let word = match parts.next() {
            Some(word) if !word.is_empty() => word.to_string(),
            _ => {
                return Err(BeanstalkError::Protocol(format!(
                    "Malformed status line: {:?}",
                    line
                )))
            }
        };
        let fields = parts.map(str::to_string).collect();
        Ok(Self { word, fields })
    }
}

/// A decoded success reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Fields after the status word (the body length included)
    pub fields: Vec<String>,

    /// Body, CRLF stripped, when the reply declared one
    pub body: Option<Vec<u8>>,
}

impl Reply {
    /// Field `index` as an unsigned integer
    pub fn num(&self, index: usize) -> Result<u64> {
        let field = self.text(index)?;
        parse_num(field)
    }

    /// Field `index` as raw text
    pub fn text(&self, index: usize) -> Result<&str> {
        self.fields.get(index).map(String::as_str).ok_or_else(|| {
            BeanstalkError::Protocol(format!("Reply is missing field {}", index))
        })
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body.unwrap_or_default()
    }
}

fn parse_num(field: &str) -> Result<u64> {
    // u64::from_str accepts a leading '+'; the wire never sends one
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BeanstalkError::Protocol(format!(
            "Expected an unsigned integer, got {:?}",
            field
        )));
    }
    field
        .parse()
        .map_err(|_| BeanstalkError::Protocol(format!("Integer out of range: {}", field)))
}

/// Classify a status line against what `command` expects.
///
/// Success yields the line back; a known error word becomes
/// `BeanstalkError::Command`; anything else is a protocol violation.
pub fn classify(status: StatusLine, command: &Command<'_>) -> Result<StatusLine> {
    let expect = command.expect();

    if status.word == expect.success {
        if status.fields.len() != expect.fields {
            return Err(BeanstalkError::Protocol(format!(
                "{} reply to {} has {} fields, expected {}",
                status.word,
                command.verb(),
                status.fields.len(),
                expect.fields
            )));
        }
        if expect.numeric {
            for field in &status.fields {
                parse_num(field)?;
            }
        }
        return Ok(status);
    }

    let known = command.errors().contains(&status.word.as_str())
        || UNIVERSAL_ERRORS.contains(&status.word.as_str());

    match CommandStatus::from_word(&status.word) {
        Some(mut error) if known => {
            // Only put's BURIED carries a field (the new job's id)
            let allowed = match (&error, command) {
                (CommandStatus::Buried { .. }, Command::Put { .. }) => 1,
                _ => 0,
            };
            if status.fields.len() != allowed {
                return Err(BeanstalkError::Protocol(format!(
                    "{} reply to {} has {} fields, expected {}",
                    status.word,
                    command.verb(),
                    status.fields.len(),
                    allowed
                )));
            }
            if let CommandStatus::Buried { id } = &mut error {
                *id = status.fields.first().map(|f| parse_num(f)).transpose()?;
            }
            Err(BeanstalkError::Command {
                verb: command.verb(),
                status: error,
            })
        }
        _ => Err(BeanstalkError::Protocol(format!(
            "Unexpected response to {}: {}",
            command.verb(),
            status.word
        ))),
    }
}

/// Read one status-only reply
pub fn expect<S: Duplex>(stream: &mut LineStream<S>, command: &Command<'_>) -> Result<Reply> {
    let status = read_status(stream, command)?;
    Ok(Reply {
        fields: status.fields,
        body: None,
    })
}

/// Read a reply whose last field declares the length of a body
pub fn expect_with_body<S: Duplex>(
    stream: &mut LineStream<S>,
    command: &Command<'_>,
    max_body_size: usize,
) -> Result<Reply> {
    let status = read_status(stream, command)?;

    let declared = status
        .fields
        .last()
        .ok_or_else(|| BeanstalkError::Protocol("Reply has no body length".to_string()))?;
    let len = parse_num(declared)?;
    if len > max_body_size as u64 {
        return Err(BeanstalkError::Protocol(format!(
            "Body too large: {} bytes (max {})",
            len, max_body_size
        )));
    }

    let body = stream.read_exact(len as usize)?;
    Ok(Reply {
        fields: status.fields,
        body: Some(body),
    })
}

/// Read whichever reply shape `command` expects
pub fn read_reply<S: Duplex>(
    stream: &mut LineStream<S>,
    command: &Command<'_>,
    max_body_size: usize,
) -> Result<Reply> {
    match command.expect() {
        Expect { body: true, .. } => expect_with_body(stream, command, max_body_size),
        Expect { body: false, .. } => expect(stream, command),
    }
}

fn read_status<S: Duplex>(stream: &mut LineStream<S>, command: &Command<'_>) -> Result<StatusLine> {
    let line = stream.read_line()?;
    tracing::trace!("<- {}", line);
    classify(StatusLine::parse(&line)?, command)
}
