//! Protocol Tests
//!
//! Command encoding, line framing, reply classification and stats parsing.

mod common;

use beanstalk::network::LineStream;
use beanstalk::protocol::{
    classify, encode_command, expect, expect_with_body, parse_list, parse_stats, Arg,
    Command, StatusLine,
};
use beanstalk::{BeanstalkError, CommandStatus};
use common::MockStream;

fn line_stream(reply: &[u8], max_line_len: usize) -> LineStream<MockStream> {
    LineStream::new(MockStream::new(b"", reply), max_line_len)
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_wire_format_put() {
    let cmd = Command::Put {
        pri: 1024,
        delay: 0,
        ttr: 60,
        body: b"hello",
    };
    assert_eq!(&encode_command(&cmd)[..], b"put 1024 0 60 5\r\nhello\r\n");
}

#[test]
fn test_put_length_arg_matches_body() {
    let body = vec![b'z'; 300];
    let cmd = Command::Put {
        pri: 0,
        delay: 0,
        ttr: 0,
        body: &body,
    };

    assert_eq!(cmd.args().last(), Some(&Arg::Num(300)));
    assert_eq!(cmd.body(), Some(&body[..]));
}

#[test]
fn test_wire_format_no_args() {
    for (cmd, wire) in [
        (Command::Reserve, "reserve\r\n"),
        (Command::PeekReady, "peek-ready\r\n"),
        (Command::PeekDelayed, "peek-delayed\r\n"),
        (Command::PeekBuried, "peek-buried\r\n"),
        (Command::Stats, "stats\r\n"),
        (Command::ListTubes, "list-tubes\r\n"),
        (Command::ListTubeUsed, "list-tube-used\r\n"),
        (Command::ListTubesWatched, "list-tubes-watched\r\n"),
    ] {
        assert_eq!(&encode_command(&cmd)[..], wire.as_bytes());
    }
}

#[test]
fn test_wire_format_with_args() {
    for (cmd, wire) in [
        (Command::ReserveWithTimeout { seconds: 10 }, "reserve-with-timeout 10\r\n"),
        (Command::Release { id: 3, pri: 7, delay: 2 }, "release 3 7 2\r\n"),
        (Command::Bury { id: 3, pri: 7 }, "bury 3 7\r\n"),
        (Command::Kick { bound: 2 }, "kick 2\r\n"),
        (Command::StatsTube { tube: "default" }, "stats-tube default\r\n"),
        (Command::PauseTube { tube: "default", seconds: 5 }, "pause-tube default 5\r\n"),
        (Command::Delete { id: u64::MAX }, "delete 18446744073709551615\r\n"),
    ] {
        assert_eq!(&encode_command(&cmd)[..], wire.as_bytes());
    }
}

#[test]
fn test_frames_written_back_to_back() {
    let stream = MockStream::new(b"", b"");
    let written = stream.written();
    let mut stream = LineStream::new(stream, 64);

    stream.write_frame(&encode_command(&Command::Touch { id: 9 })).unwrap();
    stream.write_frame(&encode_command(&Command::Delete { id: 9 })).unwrap();

    assert_eq!(&*written.lock().unwrap(), b"touch 9\r\ndelete 9\r\n");
}

// =============================================================================
// Line Framing Tests
// =============================================================================

#[test]
fn test_read_line_strips_crlf() {
    let mut stream = line_stream(b"INSERTED 1\r\nDELETED\r\n", 64);

    assert_eq!(stream.read_line().unwrap(), "INSERTED 1");
    assert_eq!(stream.read_line().unwrap(), "DELETED");
}

#[test]
fn test_read_line_bare_lf_is_protocol_error() {
    let mut stream = line_stream(b"DELETED\n", 64);

    assert!(matches!(stream.read_line(), Err(BeanstalkError::Protocol(_))));
}

#[test]
fn test_read_line_over_bound_is_protocol_error() {
    let long = vec![b'A'; 100];
    let mut stream = line_stream(&long, 16);

    let err = stream.read_line().unwrap_err();
    assert!(matches!(err, BeanstalkError::Protocol(_)));
    assert!(err.to_string().contains("16 bytes"));
}

#[test]
fn test_read_line_eof_is_transport_error() {
    let mut stream = line_stream(b"DELE", 64);

    assert!(matches!(stream.read_line(), Err(BeanstalkError::Transport(_))));
}

#[test]
fn test_read_exact_consumes_crlf() {
    let mut stream = line_stream(b"ab\r\n\r\nNEXT\r\n", 64);

    assert_eq!(stream.read_exact(4).unwrap(), b"ab\r\n");
    assert_eq!(stream.read_line().unwrap(), "NEXT");
}

#[test]
fn test_read_exact_missing_crlf() {
    let mut stream = line_stream(b"abcd", 64);

    assert!(matches!(stream.read_exact(2), Err(BeanstalkError::Protocol(_))));
}

#[test]
fn test_read_exact_length_overflow() {
    let mut stream = line_stream(b"x\r\n", 64);

    assert!(matches!(
        stream.read_exact(usize::MAX),
        Err(BeanstalkError::Protocol(_))
    ));
}

#[test]
fn test_write_line_joins_fields() {
    let stream = MockStream::new(b"", b"");
    let written = stream.written();
    let mut stream = LineStream::new(stream, 64);

    stream.write_line(&["kick", "2"]).unwrap();
    assert_eq!(&*written.lock().unwrap(), b"kick 2\r\n");
}

// =============================================================================
// Reply Classification Tests
// =============================================================================

#[test]
fn test_status_line_split() {
    let line = StatusLine::parse("RESERVED 4 12").unwrap();
    assert_eq!(line.word, "RESERVED");
    assert_eq!(line.fields, vec!["4", "12"]);

    assert!(matches!(StatusLine::parse(""), Err(BeanstalkError::Protocol(_))));
}

#[test]
fn test_classify_success() {
    let line = StatusLine::parse("KICKED 3").unwrap();
    let line = classify(line, &Command::Kick { bound: 5 }).unwrap();
    assert_eq!(line.fields, vec!["3"]);
}

#[test]
fn test_classify_known_errors_per_verb() {
    let cases: Vec<(Command<'_>, &str, CommandStatus)> = vec![
        (Command::Delete { id: 1 }, "NOT_FOUND", CommandStatus::NotFound),
        (Command::Release { id: 1, pri: 0, delay: 0 }, "NOT_FOUND", CommandStatus::NotFound),
        (Command::Touch { id: 1 }, "NOT_FOUND", CommandStatus::NotFound),
        (Command::PeekBuried, "NOT_FOUND", CommandStatus::NotFound),
        (Command::StatsTube { tube: "x" }, "NOT_FOUND", CommandStatus::NotFound),
        (Command::Reserve, "TIMED_OUT", CommandStatus::TimedOut),
        (Command::Ignore { tube: "x" }, "NOT_IGNORED", CommandStatus::NotIgnored),
        (Command::Stats, "INTERNAL_ERROR", CommandStatus::InternalError),
    ];

    for (cmd, word, status) in cases {
        let err = classify(StatusLine::parse(word).unwrap(), &cmd).unwrap_err();
        match err {
            BeanstalkError::Command { verb, status: got } => {
                assert_eq!(verb, cmd.verb());
                assert_eq!(got, status);
                assert_eq!(got.word(), word);
            }
            other => panic!("Expected command error for {}, got {:?}", word, other),
        }
    }
}

#[test]
fn test_classify_rejects_fields_on_error_words() {
    for (cmd, line) in [
        (Command::Delete { id: 1 }, "NOT_FOUND 7"),
        (Command::Put { pri: 0, delay: 0, ttr: 0, body: b"" }, "DRAINING x y"),
        (Command::Release { id: 1, pri: 0, delay: 0 }, "BURIED 9"),
        (Command::Put { pri: 0, delay: 0, ttr: 0, body: b"" }, "BURIED"),
    ] {
        let result = classify(StatusLine::parse(line).unwrap(), &cmd);
        assert!(
            matches!(result, Err(BeanstalkError::Protocol(_))),
            "{:?} should be a protocol error for {}",
            line,
            cmd.verb()
        );
    }
}

#[test]
fn test_classify_rejects_non_numeric_success_fields() {
    let result = classify(StatusLine::parse("FOUND x 1").unwrap(), &Command::PeekReady);
    assert!(matches!(result, Err(BeanstalkError::Protocol(_))));

    // USING carries a tube name, not a number
    let line = classify(StatusLine::parse("USING emails").unwrap(), &Command::ListTubeUsed).unwrap();
    assert_eq!(line.fields, vec!["emails"]);
}

#[test]
fn test_classify_unknown_word() {
    let err = classify(StatusLine::parse("WHAT").unwrap(), &Command::Stats).unwrap_err();
    assert!(err.to_string().contains("Unexpected response to stats"));
}

#[test]
fn test_expect_and_expect_with_body() {
    let mut stream = line_stream(b"DELETED\r\nFOUND 2 3\r\nabc\r\n", 64);

    let reply = expect(&mut stream, &Command::Delete { id: 2 }).unwrap();
    assert!(reply.body.is_none());

    let reply = expect_with_body(&mut stream, &Command::Peek { id: 2 }, 1024).unwrap();
    assert_eq!(reply.num(0).unwrap(), 2);
    assert_eq!(reply.into_body(), b"abc");
}

#[test]
fn test_command_status_display() {
    assert_eq!(CommandStatus::Buried { id: Some(4) }.to_string(), "BURIED 4");
    assert_eq!(CommandStatus::Draining.to_string(), "DRAINING");
    assert_eq!(CommandStatus::from_word("NOT_FOUND"), Some(CommandStatus::NotFound));
    assert_eq!(CommandStatus::from_word("INSERTED"), None);
}

// =============================================================================
// Stats Parsing Tests
// =============================================================================

#[test]
fn test_parse_stats_fixture() {
    let stats = parse_stats(b"---\na: ok\n").unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats.get("a"), Some("ok"));
}

#[test]
fn test_parse_stats_indented_keys() {
    let stats = parse_stats(b"---\n  k1: v1\n  k2: v2\n").unwrap();
    let pairs: Vec<_> = stats.iter().collect();
    assert_eq!(pairs, vec![("k1", "v1"), ("k2", "v2")]);
}

#[test]
fn test_parse_stats_keeps_order_and_last_wins() {
    let stats = parse_stats(b"---\nb: 1\na: 2\nb: 3\n").unwrap();
    let pairs: Vec<_> = stats.iter().collect();
    assert_eq!(pairs, vec![("b", "3"), ("a", "2")]);
}

#[test]
fn test_parse_stats_values_are_text() {
    let stats = parse_stats(b"---\nname: \"quoted\"\nversion: 1.12\n").unwrap();
    assert_eq!(stats.get("name"), Some("\"quoted\""));
    assert_eq!(stats.get("version"), Some("1.12"));
    assert!(matches!(stats.get_u64("version"), Err(BeanstalkError::Parse(_))));
}

#[test]
fn test_parse_stats_missing_separator() {
    assert!(matches!(
        parse_stats(b"---\nno-separator\n"),
        Err(BeanstalkError::Parse(_))
    ));
}

#[test]
fn test_parse_stats_skips_blank_lines() {
    let stats = parse_stats(b"---\n\na: 1\n\n").unwrap();
    assert_eq!(stats.len(), 1);
}

#[test]
fn test_parse_list() {
    assert_eq!(
        parse_list(b"---\n- default\n- emails\n").unwrap(),
        vec!["default", "emails"]
    );
    assert!(matches!(
        parse_list(b"---\ndefault\n"),
        Err(BeanstalkError::Parse(_))
    ));
}
