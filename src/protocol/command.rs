//! Command definitions
//!
//! One variant per protocol verb, plus the reply shape each one expects.

/// A positional command argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// Decimal unsigned integer
    Num(u64),
    /// Opaque token; never contains whitespace or CRLF
    Token(&'a str),
}

/// What a successful reply looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expect {
    /// Status word on success
    pub success: &'static str,

    /// Number of fields following the word
    pub fields: usize,

    /// Whether the last field is a byte count with a body after the line
    pub body: bool,

    /// Whether every field is an unsigned integer (false only for `USING <tube>`)
    pub numeric: bool,
}

impl Expect {
    const fn line(success: &'static str, fields: usize) -> Self {
        Self { success, fields, body: false, numeric: true }
    }

    const fn with_body(success: &'static str, fields: usize) -> Self {
        Self { success, fields, body: true, numeric: true }
    }

    const fn text(success: &'static str, fields: usize) -> Self {
        Self { success, fields, body: false, numeric: false }
    }
}

/// A command ready to be encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    // -------------------------------------------------------------------------
    // Producer
    // -------------------------------------------------------------------------
    Put { pri: u32, delay: u64, ttr: u64, body: &'a [u8] },
    Use { tube: &'a str },

    // -------------------------------------------------------------------------
    // Worker
    // -------------------------------------------------------------------------
    Reserve,
    ReserveWithTimeout { seconds: u64 },
    ReserveJob { id: u64 },
    Delete { id: u64 },
    Release { id: u64, pri: u32, delay: u64 },
    Bury { id: u64, pri: u32 },
    Touch { id: u64 },
    Watch { tube: &'a str },
    Ignore { tube: &'a str },

    // -------------------------------------------------------------------------
    // Inspection / administration
    // -------------------------------------------------------------------------
    Peek { id: u64 },
    PeekReady,
    PeekDelayed,
    PeekBuried,
    Kick { bound: u64 },
    KickJob { id: u64 },
    StatsJob { id: u64 },
    StatsTube { tube: &'a str },
    Stats,
    ListTubes,
    ListTubeUsed,
    ListTubesWatched,
    PauseTube { tube: &'a str, seconds: u64 },
}

impl<'a> Command<'a> {
    /// The wire verb
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Put { .. } => "put",
            Command::Use { .. } => "use",
            Command::Reserve => "reserve",
            Command::ReserveWithTimeout { .. } => "reserve-with-timeout",
            Command::ReserveJob { .. } => "reserve-job",
            Command::Delete { .. } => "delete",
            Command::Release { .. } => "release",
            Command::Bury { .. } => "bury",
            Command::Touch { .. } => "touch",
            Command::Watch { .. } => "watch",
            Command::Ignore { .. } => "ignore",
            Command::Peek { .. } => "peek",
            Command::PeekReady => "peek-ready",
            Command::PeekDelayed => "peek-delayed",
            Command::PeekBuried => "peek-buried",
            Command::Kick { .. } => "kick",
            Command::KickJob { .. } => "kick-job",
            Command::StatsJob { .. } => "stats-job",
            Command::StatsTube { .. } => "stats-tube",
            Command::Stats => "stats",
            Command::ListTubes => "list-tubes",
            Command::ListTubeUsed => "list-tube-used",
            Command::ListTubesWatched => "list-tubes-watched",
            Command::PauseTube { .. } => "pause-tube",
        }
    }

    /// Positional arguments, in wire order
    ///
    /// For put the body length is appended here, so it always matches the
    /// body that follows.
    pub fn args(&self) -> Vec<Arg<'a>> {
        match *self {
            Command::Put { pri, delay, ttr, body } => vec![
                Arg::Num(pri as u64),
                Arg::Num(delay),
                Arg::Num(ttr),
                Arg::Num(body.len() as u64),
            ],
            Command::Use { tube }
            | Command::Watch { tube }
            | Command::Ignore { tube }
            | Command::StatsTube { tube } => vec![Arg::Token(tube)],
            Command::ReserveWithTimeout { seconds } => vec![Arg::Num(seconds)],
            Command::ReserveJob { id }
            | Command::Delete { id }
            | Command::Touch { id }
            | Command::Peek { id }
            | Command::KickJob { id }
            | Command::StatsJob { id } => vec![Arg::Num(id)],
            Command::Release { id, pri, delay } => {
                vec![Arg::Num(id), Arg::Num(pri as u64), Arg::Num(delay)]
            }
            Command::Bury { id, pri } => vec![Arg::Num(id), Arg::Num(pri as u64)],
            Command::Kick { bound } => vec![Arg::Num(bound)],
            Command::PauseTube { tube, seconds } => vec![Arg::Token(tube), Arg::Num(seconds)],
            Command::Reserve
            | Command::PeekReady
            | Command::PeekDelayed
            | Command::PeekBuried
            | Command::Stats
            | Command::ListTubes
            | Command::ListTubeUsed
            | Command::ListTubesWatched => Vec::new(),
        }
    }

    /// Raw body sent after the header line, if any
    pub fn body(&self) -> Option<&'a [u8]> {
        match *self {
            Command::Put { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Shape of the success reply
    pub fn expect(&self) -> Expect {
        match self {
            Command::Put { .. } => Expect::line("INSERTED", 1),
            Command::Use { .. } | Command::ListTubeUsed => Expect::text("USING", 1),
            Command::Reserve
            | Command::ReserveWithTimeout { .. }
            | Command::ReserveJob { .. } => Expect::with_body("RESERVED", 2),
            Command::Delete { .. } => Expect::line("DELETED", 0),
            Command::Release { .. } => Expect::line("RELEASED", 0),
            Command::Bury { .. } => Expect::line("BURIED", 0),
            Command::Touch { .. } => Expect::line("TOUCHED", 0),
            Command::Watch { .. } | Command::Ignore { .. } => Expect::line("WATCHING", 1),
            Command::Peek { .. }
            | Command::PeekReady
            | Command::PeekDelayed
            | Command::PeekBuried => Expect::with_body("FOUND", 2),
            Command::Kick { .. } => Expect::line("KICKED", 1),
            Command::KickJob { .. } => Expect::line("KICKED", 0),
            Command::StatsJob { .. }
            | Command::StatsTube { .. }
            | Command::Stats
            | Command::ListTubes
            | Command::ListTubesWatched => Expect::with_body("OK", 1),
            Command::PauseTube { .. } => Expect::line("PAUSED", 0),
        }
    }

    /// Error words this verb can legitimately receive, besides the
    /// universal ones every verb may get
    pub fn errors(&self) -> &'static [&'static str] {
        match self {
            Command::Put { .. } => &["BURIED", "EXPECTED_CRLF", "JOB_TOO_BIG", "DRAINING"],
            Command::Reserve | Command::ReserveWithTimeout { .. } => {
                &["DEADLINE_SOON", "TIMED_OUT"]
            }
            Command::Release { .. } => &["BURIED", "NOT_FOUND"],
            Command::Ignore { .. } => &["NOT_IGNORED"],
            Command::ReserveJob { .. }
            | Command::Delete { .. }
            | Command::Bury { .. }
            | Command::Touch { .. }
            | Command::Peek { .. }
            | Command::PeekReady
            | Command::PeekDelayed
            | Command::PeekBuried
            | Command::KickJob { .. }
            | Command::StatsJob { .. }
            | Command::StatsTube { .. }
            | Command::PauseTube { .. } => &["NOT_FOUND"],
            Command::Use { .. }
            | Command::Watch { .. }
            | Command::Kick { .. }
            | Command::Stats
            | Command::ListTubes
            | Command::ListTubeUsed
            | Command::ListTubesWatched => &[],
        }
    }
}

/// Errors any verb may receive
pub const UNIVERSAL_ERRORS: &[&str] = &["OUT_OF_MEMORY", "INTERNAL_ERROR", "BAD_FORMAT", "UNKNOWN_COMMAND"];
