use reqwest::Url;
use tracing::{debug, error, info, warn};

use crate::{
    mailer::{
        api_model::{PingData, TokenData, envelope_errors, parse_ping, parse_submission, parse_token},
        config::MailerConfig,
        error::MailerError,
        feedback,
        transport::{HttpReply, Transport},
    },
    page::{page_model::Document, selector::Selector, validity},
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Lifecycle of the one form the client manages.
///
/// `Idle → TokenPending → {Ready | Unauthorized | TokenFailed}`, then from
/// `Ready` only: `SubmitPending → {Sent | SendFailed}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    TokenPending,
    Ready,
    Unauthorized,
    TokenFailed,
    SubmitPending,
    Sent,
    SendFailed,
}

impl ClientState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientState::Idle => "idle",
            ClientState::TokenPending => "token_pending",
            ClientState::Ready => "ready",
            ClientState::Unauthorized => "unauthorized",
            ClientState::TokenFailed => "token_failed",
            ClientState::SubmitPending => "submit_pending",
            ClientState::Sent => "sent",
            ClientState::SendFailed => "send_failed",
        }
    }
}

/// The submit event the client reacts to. Mirrors `preventDefault()`.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub struct FormMailerClient<T: Transport> {
    config: MailerConfig,
    transport: T,
    state: ClientState,
    token: Option<TokenData>,
    tracer: TraceLogger,
    step: u64,
}

impl<T: Transport> FormMailerClient<T> {
    pub fn new(config: MailerConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            state: ClientState::Idle,
            token: None,
            tracer: TraceLogger::disabled(),
            step: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Token applied to the form, once the client is ready.
    pub fn token(&self) -> Option<&TokenData> {
        self.token.as_ref()
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    // =====================================================================
    // Token acquisition
    // =====================================================================

    /// Fetch a sender token and point the configured form at it.
    ///
    /// Configuration problems are only logged. Rejections and transport
    /// failures hide the submit button and show an error on the page.
    pub fn acquire_token(&mut self, document: &mut Document) -> &ClientState {
        if !self.config.has_form {
            debug!("page has no mailer form, skipping token request");
            return &self.state;
        }

        let Some((form_id, selector)) = self.resolve_form(document) else {
            error!("mailer form is not configured for this page (need form_id and form_selector)");
            self.trace(self.event("config_error"));
            return &self.state;
        };

        let url = self.config.token_url();
        self.transition(ClientState::TokenPending, self.event("token_request").with_url(&url));
        info!(form_id = %form_id, url = %url, "requesting sender token");

        let fields = vec![("formid".to_string(), form_id)];
        let reply = self.transport.post_multipart(&url, &fields);

        match reply.and_then(|r| Self::token_from_reply(&url, r)) {
            Ok(token) => {
                if let Some(form) = document.query_form_mut(&selector) {
                    form.action = token.url.clone();
                    form.method = token.method.clone();
                    form.enctype = token.enc_type.clone();
                }
                info!(action = %token.url, method = %token.method, "form target patched from token");
                let event = self.event("token_applied").with_url(&token.url);
                self.token = Some(token);
                self.transition(ClientState::Ready, event);
            }
            Err(MailerError::Status { status: 401, .. }) => {
                warn!(url = %url, "mailer rejected this page (401)");
                let message = self.config.messages.unauthorized.clone();
                self.reject_token(document, &selector, &message);
                self.transition(
                    ClientState::Unauthorized,
                    self.event("token_rejected").with_status(401),
                );
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch security token");
                let message = self.config.messages.token_failed.clone();
                self.reject_token(document, &selector, &message);
                let mut event = self.event("token_failed").with_detail(&e);
                if let MailerError::Status { status, .. } = &e {
                    event = event.with_status(*status);
                }
                self.transition(ClientState::TokenFailed, event);
            }
        }

        &self.state
    }

    /// Raw token request, without touching any page.
    pub fn fetch_token(&self, form_id: &str) -> Result<TokenData, MailerError> {
        let url = self.config.token_url();
        let fields = vec![("formid".to_string(), form_id.to_string())];
        let reply = self.transport.post_multipart(&url, &fields)?;
        Self::token_from_reply(&url, reply)
    }

    fn token_from_reply(url: &str, reply: HttpReply) -> Result<TokenData, MailerError> {
        if !reply.is_success() {
            for message in envelope_errors(&reply.body) {
                debug!(url, message = %message, "mailer error");
            }
            return Err(MailerError::Status {
                url: url.to_string(),
                status: reply.status,
            });
        }
        parse_token(&reply.body)
    }

    fn reject_token(&self, document: &mut Document, selector: &Selector, message: &str) {
        if let Some(button) = document
            .query_form_mut(selector)
            .and_then(|f| f.submit_button_mut(&self.config.submit_button_id))
        {
            feedback::disable_submit(button, &self.config.styles);
        }
        self.show_error(document, message);
    }

    // =====================================================================
    // Submission
    // =====================================================================

    /// Submit the form to the token's target.
    ///
    /// An invalid form is left to the browser: the event is not touched and
    /// nothing changes. Any valid form is intercepted so the placeholder
    /// action is never used, but it is only sent once a token has been
    /// applied and the form has its submit button.
    pub fn submit(&mut self, document: &mut Document, event: &mut SubmitEvent) -> &ClientState {
        if !self.config.has_form {
            return &self.state;
        }
        let Some(selector) = self.form_selector(document) else {
            return &self.state;
        };

        let (action, fields) = match document.query_form(&selector) {
            Some(form) => {
                let invalid = validity::invalid_fields(form);
                if !invalid.is_empty() {
                    debug!(?invalid, "form failed validation, leaving submit to the browser");
                    return &self.state;
                }
                (form.action.clone(), form.form_data())
            }
            None => return &self.state,
        };

        event.prevent_default();

        if self.state != ClientState::Ready {
            let message = match self.state {
                ClientState::Sent | ClientState::SendFailed => {
                    warn!(state = self.state.as_str(), "submit after the single-use token was spent");
                    self.config.messages.token_spent.clone()
                }
                _ => {
                    warn!(state = self.state.as_str(), "submit before the security token was applied");
                    self.config.messages.token_pending.clone()
                }
            };
            self.show_error(document, &message);
            self.trace(self.event("submit_not_ready"));
            return &self.state;
        }

        let Some(button) = document
            .query_form_mut(&selector)
            .and_then(|f| f.submit_button_mut(&self.config.submit_button_id))
        else {
            error!(button = %self.config.submit_button_id, "form has no submit button, not sending");
            self.trace(self.event("submit_no_button"));
            return &self.state;
        };
        feedback::mark_sending(button, &self.config.messages);

        let sent = self.send_form(&action, &fields);
        let Some(form) = document.query_form_mut(&selector) else {
            return &self.state;
        };

        match sent {
            Ok(()) => {
                form.clear_text_fields();
                if let Some(button) = form.submit_button_mut(&self.config.submit_button_id) {
                    feedback::mark_sent(button, &self.config.styles, &self.config.messages);
                }
                info!(action = %action, "message sent");
                self.transition(ClientState::Sent, self.event("submit_ok"));
            }
            Err(e) => {
                warn!(action = %action, error = %e, "failed to send form");
                if let Some(button) = form.submit_button_mut(&self.config.submit_button_id) {
                    feedback::mark_failed(button, &self.config.styles, &self.config.messages);
                }
                let message = self.config.messages.send_failed.clone();
                self.show_error(document, &message);
                self.transition(
                    ClientState::SendFailed,
                    self.event("submit_failed").with_detail(&e),
                );
            }
        }

        &self.state
    }

    fn send_form(&mut self, action: &str, fields: &[(String, String)]) -> Result<(), MailerError> {
        let url = resolve_action(&self.config.base_url, action)?;
        self.transition(
            ClientState::SubmitPending,
            self.event("submit_request").with_url(&url),
        );

        let reply = self.transport.post_multipart(&url, fields)?;
        if !reply.is_success() {
            warn!(url = %url, status = reply.status, "form endpoint answered with an error status");
        }

        match parse_submission(&reply.body)? {
            Some(_) => Ok(()),
            None => Err(MailerError::MalformedResponse {
                context: "submission response".into(),
                message: "body is null".into(),
            }),
        }
    }

    // =====================================================================
    // Error display & health check
    // =====================================================================

    /// Show `message` in the page's error region. No-op if there is none.
    pub fn show_error(&self, document: &mut Document, message: &str) -> bool {
        let shown = feedback::show_error(document, &self.config.error_region_id, message);
        if !shown {
            debug!(region = %self.config.error_region_id, message, "no error region on page");
        }
        shown
    }

    /// `GET /ping` against the mailer.
    pub fn ping(&self) -> Result<PingData, MailerError> {
        let url = self.config.ping_url();
        let reply = self.transport.get(&url)?;
        if !reply.is_success() {
            return Err(MailerError::Status {
                url,
                status: reply.status,
            });
        }
        let data = parse_ping(&reply.body)?;
        if data.ping != "pong" {
            return Err(MailerError::MalformedResponse {
                context: "ping response".into(),
                message: format!("unexpected ping value '{}'", data.ping),
            });
        }
        Ok(data)
    }

    // =====================================================================
    // Helpers
    // =====================================================================

    fn resolve_form(&self, document: &Document) -> Option<(String, Selector)> {
        let Some(form_id) = self.config.form_id.clone().filter(|id| !id.is_empty()) else {
            error!("no form id configured");
            return None;
        };
        let selector = self.form_selector(document)?;
        Some((form_id, selector))
    }

    /// Selector of the configured form, if it parses and matches a form on the page.
    fn form_selector(&self, document: &Document) -> Option<Selector> {
        let raw = self.config.form_selector.as_deref()?;
        let selector = match Selector::parse(raw) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "unusable form selector");
                return None;
            }
        };
        if document.query_form(&selector).is_none() {
            error!(selector = %selector, "form element not found");
            return None;
        }
        Some(selector)
    }

    fn event(&self, name: &str) -> TraceEvent {
        TraceEvent::now(self.step, &self.state, name)
    }

    /// Trace events passed here are stamped with the state being entered.
    fn transition(&mut self, next: ClientState, mut event: TraceEvent) {
        debug!(from = self.state.as_str(), to = next.as_str(), "state transition");
        event.state = next.as_str().to_string();
        self.state = next;
        self.trace(event);
    }

    fn trace(&mut self, mut event: TraceEvent) {
        self.step += 1;
        event.step = self.step;
        self.tracer.log(&event);
    }
}

/// Absolute URL for a form action; relative actions resolve against `base`.
pub fn resolve_action(base: &str, action: &str) -> Result<String, MailerError> {
    if action.trim().is_empty() {
        return Err(MailerError::InvalidUrl {
            url: action.to_string(),
            message: "form has no action".into(),
        });
    }
    if let Ok(url) = Url::parse(action) {
        return Ok(url.to_string());
    }
    let base_url = Url::parse(base).map_err(|e| MailerError::InvalidUrl {
        url: base.to_string(),
        message: e.to_string(),
    })?;
    base_url
        .join(action)
        .map(|u| u.to_string())
        .map_err(|e| MailerError::InvalidUrl {
            url: action.to_string(),
            message: e.to_string(),
        })
}
