use std::cell::RefCell;
use std::collections::VecDeque;

use js_mailer_client::mailer::{
    error::MailerError,
    transport::{HttpReply, Transport},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub fields: Vec<(String, String)>,
}

enum Scripted {
    Reply(HttpReply),
    ConnectionRefused,
}

/// Transport that answers from a script and records every request.
/// Runs out of script → connection refused.
#[derive(Default)]
pub struct FakeTransport {
    script: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Reply(HttpReply::new(status, body)));
        self
    }

    pub fn refuse(self) -> Self {
        self.script.borrow_mut().push_back(Scripted::ConnectionRefused);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn answer(&self, method: &'static str, url: &str, fields: &[(String, String)]) -> Result<HttpReply, MailerError> {
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            url: url.to_string(),
            fields: fields.to_vec(),
        });

        match self.script.borrow_mut().pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::ConnectionRefused) | None => Err(MailerError::Transport {
                url: url.to_string(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            }),
        }
    }
}

impl Transport for FakeTransport {
    fn post_multipart(&self, url: &str, fields: &[(String, String)]) -> Result<HttpReply, MailerError> {
        self.answer("POST", url, fields)
    }

    fn get(&self, url: &str) -> Result<HttpReply, MailerError> {
        self.answer("GET", url, &[])
    }
}
