use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::mailer::config::MailerConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "js-mailer-client",
    version,
    about = "Client for the js-mailer form mailer service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the mailer service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Origin header sent with every request
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Append client events as JSON lines to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Path to config file (default: js-mailer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the mailer service is reachable
    Ping,

    /// Request a sender token for a form and print it
    Token {
        /// Form identifier configured on the mailer
        #[arg(long)]
        form_id: Option<String>,
    },

    /// Fetch a token for a page snapshot, then submit its form
    Send {
        /// Page snapshot (JSON, or YAML with a .yaml/.yml extension)
        #[arg(long)]
        page: String,

        /// Form identifier configured on the mailer
        #[arg(long)]
        form_id: Option<String>,

        /// CSS selector of the form inside the page
        #[arg(long)]
        selector: Option<String>,

        /// Field values to fill in before submitting (name=value)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Where to write the resulting page snapshot (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Parse a `name=value` pair. The value may itself contain `=`.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `js-mailer.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mailer: MailerConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub trace: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Sent as the `Origin` header
    pub origin: Option<String>,

    /// Request timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("js-mailer.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = config_path, error = %e, "ignoring malformed config file");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Resolve the mailer settings: CLI > config file > defaults.
///
/// Passing a form id or selector on the command line implies `has_form`.
pub fn build_mailer_config(
    file: &MailerConfig,
    base_url: Option<&str>,
    form_id: Option<&str>,
    selector: Option<&str>,
) -> MailerConfig {
    let mut config = file.clone();
    if let Some(base) = base_url {
        config.base_url = base.to_string();
    }
    if let Some(id) = form_id {
        config.form_id = Some(id.to_string());
        config.has_form = true;
    }
    if let Some(sel) = selector {
        config.form_selector = Some(sel.to_string());
        config.has_form = true;
    }
    config
}
