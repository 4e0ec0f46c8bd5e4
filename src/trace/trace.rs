use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::mailer::client::ClientState;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub state: String,
    pub event: String,

    pub url: Option<String>,
    pub status: Option<u16>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, state: &ClientState, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            state: state.as_str().to_string(),
            event: event.to_string(),
            url: None,
            status: None,
            detail: None,
        }
    }

    pub fn with_url(mut self, url: impl ToString) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
