use std::time::Duration;

use tracing::{info, warn};

use crate::cli::config::{AppConfig, build_mailer_config};
use crate::mailer::client::{ClientState, FormMailerClient, SubmitEvent};
use crate::mailer::config::MailerConfig;
use crate::mailer::error::MailerError;
use crate::mailer::transport::ReqwestTransport;
use crate::page::page_model::Document;
use crate::page::selector::Selector;
use crate::trace::logger::TraceLogger;

/// Global CLI options; each falls back to the config file when unset.
pub struct GlobalOptions<'a> {
    pub base_url: Option<&'a str>,
    pub origin: Option<&'a str>,
    pub trace: Option<&'a str>,
}

// ============================================================================
// ping subcommand
// ============================================================================

pub fn cmd_ping(app: &AppConfig, global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_mailer_config(&app.mailer, global.base_url, None, None);
    let client = build_client(config, app, global)?;

    let pong = client.ping()?;
    println!("{} answered: {}", client.config().base_url, pong.ping);
    Ok(())
}

// ============================================================================
// token subcommand
// ============================================================================

pub fn cmd_token(
    app: &AppConfig,
    global: &GlobalOptions,
    form_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_mailer_config(&app.mailer, global.base_url, form_id, None);
    let form_id = config
        .form_id
        .clone()
        .ok_or_else(|| MailerError::Config("form id (--form-id or mailer.form_id)".into()))?;
    let client = build_client(config, app, global)?;

    let token = client.fetch_token(&form_id)?;
    println!("{}", serde_json::to_string_pretty(&token)?);
    Ok(())
}

// ============================================================================
// send subcommand
// ============================================================================

/// Run the whole page flow and return whether the message was sent.
pub fn cmd_send(
    app: &AppConfig,
    global: &GlobalOptions,
    page: &str,
    form_id: Option<&str>,
    selector: Option<&str>,
    fields: &[(String, String)],
    output: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let config = build_mailer_config(&app.mailer, global.base_url, form_id, selector);
    let mut document = Document::load(page)?;
    fill_fields(&mut document, &config, fields)?;

    let mut client = build_client(config, app, global)?;

    let token_state = client.acquire_token(&mut document).clone();
    info!(state = token_state.as_str(), "token phase finished");

    let mut event = SubmitEvent::new();
    let final_state = client.submit(&mut document, &mut event).clone();
    if !event.default_prevented() {
        warn!("submit was not intercepted (form invalid or not configured)");
    }

    let snapshot = serde_json::to_string_pretty(&document)?;
    match output {
        Some(path) => std::fs::write(path, snapshot).map_err(|e| MailerError::Io {
            path: path.to_string(),
            source: e,
        })?,
        None => println!("{}", snapshot),
    }

    eprintln!("Final state: {}", final_state.as_str());
    Ok(final_state == ClientState::Sent)
}

/// Write `name=value` pairs into the configured form before submission.
pub fn fill_fields(
    document: &mut Document,
    config: &MailerConfig,
    fields: &[(String, String)],
) -> Result<(), MailerError> {
    if fields.is_empty() {
        return Ok(());
    }
    let raw = config
        .form_selector
        .as_deref()
        .ok_or_else(|| MailerError::Config("form selector (--selector or mailer.form_selector)".into()))?;
    let selector = Selector::parse(raw)?;
    let form = document
        .query_form_mut(&selector)
        .ok_or_else(|| MailerError::Config(format!("no form matches '{}'", selector)))?;

    for (name, value) in fields {
        if !form.set_value(name, value) {
            warn!(field = %name, "form has no field with this name");
        }
    }
    Ok(())
}

fn build_client(
    config: MailerConfig,
    app: &AppConfig,
    global: &GlobalOptions,
) -> Result<FormMailerClient<ReqwestTransport>, MailerError> {
    let origin = global.origin.or(app.http.origin.as_deref());
    let timeout = app.http.timeout_secs.map(Duration::from_secs);
    let transport = ReqwestTransport::new(origin, timeout)?;

    let tracer = match global.trace.or(app.trace.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    Ok(FormMailerClient::new(config, transport).with_tracer(tracer))
}
