use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use js_mailer_client::{
    mailer::{
        api_model::{envelope_errors, parse_ping, parse_submission, parse_token},
        client::ClientState,
        error::MailerError,
        transport::HttpReply,
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

use crate::common::utils::{TOKEN_OK, temp_path};

mod common;

// =========================================================================
// Token payload
// =========================================================================

#[test]
fn token_payload_is_read_from_data() {
    let token = parse_token(TOKEN_OK).unwrap();
    assert_eq!(token.url, "/x");
    assert_eq!(token.method, "post");
    assert_eq!(token.enc_type, "multipart/form-data");
    assert_eq!(token.token, None);
}

#[test]
fn token_payload_errors_are_classified() {
    assert!(matches!(parse_token("oops"), Err(MailerError::JsonParse { .. })));
    assert!(matches!(parse_token("null"), Err(MailerError::MalformedResponse { .. })));
    assert!(matches!(parse_token(r#"{"data":null}"#), Err(MailerError::MalformedResponse { .. })));
    assert!(matches!(parse_token("[1,2]"), Err(MailerError::MalformedResponse { .. })));
    assert!(matches!(
        parse_token(r#"{"data":{"url":"/x","method":"post"}}"#),
        Err(MailerError::MalformedResponse { .. })
    ));
}

#[test]
fn ping_payload() {
    assert_eq!(parse_ping(r#"{"data":{"ping":"pong"}}"#).unwrap().ping, "pong");
    assert!(parse_ping(r#"{"data":{}}"#).is_err());
}

// =========================================================================
// Submission payload
// =========================================================================

#[test]
fn submission_null_and_empty_mean_rejected() {
    assert_eq!(parse_submission("null").unwrap(), None);
    assert_eq!(parse_submission("").unwrap(), None);
    assert!(parse_submission(r#"{"success":true}"#).unwrap().is_some());
    assert!(parse_submission("false").unwrap().is_some(), "Any non-null JSON counts as sent");
    assert!(parse_submission("<html>").is_err());
}

#[test]
fn envelope_errors_are_extracted() {
    let body = r#"{"success":false,"status_code":400,"errors":["required fields validation failed","email: required field is missing"]}"#;
    assert_eq!(
        envelope_errors(body),
        vec![
            "required fields validation failed".to_string(),
            "email: required field is missing".to_string(),
        ]
    );
    assert!(envelope_errors("not json").is_empty());
}

#[test]
fn http_reply_success_range() {
    assert!(HttpReply::new(200, "").is_success());
    assert!(HttpReply::new(201, "").is_success());
    assert!(!HttpReply::new(301, "").is_success());
    assert!(!HttpReply::new(401, "").is_success());
}

// =========================================================================
// Trace logger
// =========================================================================

#[test]
fn trace_logger_appends_json_lines() {
    let path = temp_path("trace.jsonl");
    let logger = TraceLogger::new(&path);
    assert!(logger.is_enabled());

    logger.log(&TraceEvent::now(1, &ClientState::TokenPending, "token_request").with_url("https://mailer.test/api/v1/token"));
    logger.log(&TraceEvent::now(2, &ClientState::Unauthorized, "token_rejected").with_status(401).with_detail("domain not allowed"));
    assert_eq!(logger.events_written(), 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["state"], "token_pending");
    assert_eq!(lines[0]["event"], "token_request");
    assert!(lines[0]["status"].is_null());
    assert_eq!(lines[1]["status"], 401);
    assert_eq!(lines[1]["detail"], "domain not allowed");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn trace_logger_with_bad_path_is_disabled() {
    let logger = TraceLogger::new("/definitely/not/a/dir/trace.jsonl");
    assert!(!logger.is_enabled());
    logger.log(&TraceEvent::now(1, &ClientState::Idle, "noop"));
    assert_eq!(logger.events_written(), 0);
    assert!(!TraceLogger::disabled().is_enabled());
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn trace_logger_writes_to_any_writer() {
    let buffer = SharedBuffer::default();
    let logger = TraceLogger::from_writer(buffer.clone());
    assert!(logger.is_enabled());

    logger.log(&TraceEvent::now(1, &ClientState::Ready, "token_ready"));
    logger.log(&TraceEvent::now(2, &ClientState::Sent, "submit_sent").with_status(200));

    let content = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    let events: Vec<String> = content
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .map(|v| v["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(events, vec!["token_ready", "submit_sent"]);
    assert!(content.ends_with('\n'));
    assert_eq!(logger.events_written(), 2);
}

#[test]
fn trace_logger_drops_events_the_writer_rejects() {
    let logger = TraceLogger::from_writer(BrokenWriter);
    logger.log(&TraceEvent::now(1, &ClientState::Ready, "token_ready"));
    assert!(logger.is_enabled(), "A failing writer does not disable tracing");
    assert_eq!(logger.events_written(), 0);
}
