use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://jsmailer.example.com";
pub const DEFAULT_TOKEN_PATH: &str = "/api/v1/token";
pub const DEFAULT_SUBMIT_BUTTON_ID: &str = "submitButton";
pub const DEFAULT_ERROR_REGION_ID: &str = "errorMsg";

/// Everything the host page used to provide through globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_token_path")]
    pub token_path: String,

    /// Whether the page has a mailer form at all
    #[serde(default)]
    pub has_form: bool,

    #[serde(default)]
    pub form_id: Option<String>,

    /// CSS selector locating the form element
    #[serde(default)]
    pub form_selector: Option<String>,

    #[serde(default = "default_submit_button_id")]
    pub submit_button_id: String,

    #[serde(default = "default_error_region_id")]
    pub error_region_id: String,

    #[serde(default)]
    pub messages: Messages,

    #[serde(default)]
    pub styles: ButtonStyles,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_path: default_token_path(),
            has_form: false,
            form_id: None,
            form_selector: None,
            submit_button_id: default_submit_button_id(),
            error_region_id: default_error_region_id(),
            messages: Messages::default(),
            styles: ButtonStyles::default(),
        }
    }
}

impl MailerConfig {
    /// Full URL of the token endpoint.
    pub fn token_url(&self) -> String {
        join_base(&self.base_url, &self.token_path)
    }

    pub fn ping_url(&self) -> String {
        join_base(&self.base_url, "/ping")
    }
}

/// User-facing texts for errors and button labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub unauthorized: String,
    pub token_failed: String,
    pub token_pending: String,
    pub token_spent: String,
    pub send_failed: String,
    pub sending_label: String,
    pub success_label: String,
    pub error_label: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            unauthorized: "This page is not authorized to use the form mailer system.".into(),
            token_failed: "Failed to fetch security token from form mailer system".into(),
            token_pending: "The form is not ready yet, please try again in a moment.".into(),
            token_spent: "This form has already been submitted. Reload the page to send another message.".into(),
            send_failed: "An error occurred sending your message.".into(),
            sending_label: "Sending message...".into(),
            success_label: "Thanks! Your message has been sent.".into(),
            error_label: "Error!".into(),
        }
    }
}

/// CSS classes toggled on the submit button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyles {
    pub primary: String,
    pub inactive: String,
    pub success: String,
}

impl Default for ButtonStyles {
    fn default() -> Self {
        Self {
            primary: "btn-primary".into(),
            inactive: "btn-secondary".into(),
            success: "btn-success".into(),
        }
    }
}

fn join_base(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

// Serde default helpers
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_token_path() -> String { DEFAULT_TOKEN_PATH.to_string() }
fn default_submit_button_id() -> String { DEFAULT_SUBMIT_BUTTON_ID.to_string() }
fn default_error_region_id() -> String { DEFAULT_ERROR_REGION_ID.to_string() }
