use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    /// Request never produced an HTTP response (DNS, connect, TLS, timeout)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Mailer answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body was not valid JSON
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON was valid but lacked the expected payload
    #[error("Malformed response ({context}): {message}")]
    MalformedResponse { context: String, message: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse page snapshot {path}: {message}")]
    Snapshot { path: String, message: String },

    #[error("Missing configuration: {0}")]
    Config(String),
}
