use std::time::Duration;

use reqwest::blocking::{Client, multipart};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN};
use tracing::debug;

use crate::mailer::error::MailerError;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP seam of the client. Every call is a single attempt.
pub trait Transport {
    /// POST `fields` as a `multipart/form-data` body.
    fn post_multipart(&self, url: &str, fields: &[(String, String)]) -> Result<HttpReply, MailerError>;

    fn get(&self, url: &str) -> Result<HttpReply, MailerError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_multipart(&self, url: &str, fields: &[(String, String)]) -> Result<HttpReply, MailerError> {
        (**self).post_multipart(url, fields)
    }

    fn get(&self, url: &str) -> Result<HttpReply, MailerError> {
        (**self).get(url)
    }
}

/// Blocking `reqwest` transport.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `origin` is sent as the `Origin` header; the mailer matches it
    /// against the form's allowed domains.
    pub fn new(origin: Option<&str>, timeout: Option<Duration>) -> Result<Self, MailerError> {
        let mut headers = HeaderMap::new();
        if let Some(origin) = origin {
            let value = HeaderValue::from_str(origin).map_err(|e| MailerError::InvalidUrl {
                url: origin.to_string(),
                message: e.to_string(),
            })?;
            headers.insert(ORIGIN, value);
        }

        // The blocking client defaults to a 30s timeout; `None` disables it
        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("js-mailer-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| MailerError::Transport {
            url: String::new(),
            source: e.into(),
        })?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_multipart(&self, url: &str, fields: &[(String, String)]) -> Result<HttpReply, MailerError> {
        let form = fields
            .iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            });

        debug!(url, fields = fields.len(), "POST multipart");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .map_err(|e| MailerError::Transport {
                url: url.to_string(),
                source: e.into(),
            })?;

        read_reply(url, response)
    }

    fn get(&self, url: &str) -> Result<HttpReply, MailerError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().map_err(|e| MailerError::Transport {
            url: url.to_string(),
            source: e.into(),
        })?;

        read_reply(url, response)
    }
}

fn read_reply(url: &str, response: reqwest::blocking::Response) -> Result<HttpReply, MailerError> {
    let status = response.status().as_u16();
    let body = response.text().map_err(|e| MailerError::Transport {
        url: url.to_string(),
        source: e.into(),
    })?;
    debug!(url, status, bytes = body.len(), "response received");
    Ok(HttpReply { status, body })
}
