use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mailer::error::MailerError;

/// Response wrapper the mailer puts around every payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Submission target handed out by the token endpoint.
///
/// Older mailers answer with `method`/`enc_type`, newer ones with
/// `request_method`/`encoding`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub url: String,
    #[serde(alias = "request_method")]
    pub method: String,
    #[serde(alias = "encoding")]
    pub enc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingData {
    pub ping: String,
}

/// Decode the token endpoint body into its `data` payload.
pub fn parse_token(body: &str) -> Result<TokenData, MailerError> {
    parse_payload(body, "token response")
}

pub fn parse_ping(body: &str) -> Result<PingData, MailerError> {
    parse_payload(body, "ping response")
}

/// Decode the form endpoint body. `Ok(None)` means the body was JSON `null`
/// or empty, which the mailer uses to signal a rejected submission.
pub fn parse_submission(body: &str) -> Result<Option<Value>, MailerError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| MailerError::JsonParse {
        context: "submission response".into(),
        source: e,
    })?;
    Ok((!value.is_null()).then_some(value))
}

/// Server-side error messages carried by an envelope, if the body is one.
pub fn envelope_errors(body: &str) -> Vec<String> {
    serde_json::from_str::<ApiEnvelope<Value>>(body)
        .map(|env| env.errors)
        .unwrap_or_default()
}

fn parse_payload<T: for<'de> Deserialize<'de>>(body: &str, context: &str) -> Result<T, MailerError> {
    let value: Value = serde_json::from_str(body).map_err(|e| MailerError::JsonParse {
        context: context.into(),
        source: e,
    })?;

    if value.is_null() {
        return Err(MailerError::MalformedResponse {
            context: context.into(),
            message: "body is null".into(),
        });
    }

    let envelope: ApiEnvelope<Value> =
        serde_json::from_value(value).map_err(|e| MailerError::MalformedResponse {
            context: context.into(),
            message: e.to_string(),
        })?;

    let data = envelope
        .data
        .filter(|d| !d.is_null())
        .ok_or_else(|| MailerError::MalformedResponse {
            context: context.into(),
            message: "missing 'data' object".into(),
        })?;

    serde_json::from_value(data).map_err(|e| MailerError::MalformedResponse {
        context: context.into(),
        message: e.to_string(),
    })
}
