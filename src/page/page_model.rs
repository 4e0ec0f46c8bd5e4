use serde::{Deserialize, Serialize};

use crate::mailer::error::MailerError;
use crate::page::selector::Selector;

/// Snapshot of the page the mailer client works on.
///
/// Stands in for the DOM: the client only ever touches the forms, their
/// submit buttons and the error region, so that is all a snapshot carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub forms: Vec<FormElement>,
    #[serde(default, rename = "errorRegion", skip_serializing_if = "Option::is_none")]
    pub error_region: Option<ErrorRegion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub action: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_enctype")]
    pub enctype: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default, rename = "submitButton", skip_serializing_if = "Option::is_none")]
    pub submit_button: Option<SubmitButton>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTag {
    Input,
    Textarea,
    Select,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub tag: FieldTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitButton {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRegion {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub visible: bool,
}

fn default_method() -> String { "get".to_string() }
fn default_enctype() -> String { "application/x-www-form-urlencoded".to_string() }

/// Input types that never hold user-typed text.
const NON_TEXT_INPUT_TYPES: &[&str] = &[
    "hidden", "submit", "button", "reset", "image", "checkbox", "radio", "file",
];

impl Document {
    /// Load a page snapshot. `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    pub fn load(path: &str) -> Result<Self, MailerError> {
        let content = std::fs::read_to_string(path).map_err(|e| MailerError::Io {
            path: path.to_string(),
            source: e,
        })?;

        if path.ends_with(".yaml") || path.ends_with(".yml") {
            serde_yaml::from_str(&content).map_err(|e| MailerError::Snapshot {
                path: path.to_string(),
                message: e.to_string(),
            })
        } else {
            serde_json::from_str(&content).map_err(|e| MailerError::Snapshot {
                path: path.to_string(),
                message: e.to_string(),
            })
        }
    }

    /// First form matching the selector, like `document.querySelector`.
    pub fn query_form(&self, selector: &Selector) -> Option<&FormElement> {
        self.forms.iter().find(|f| selector.matches_form(f))
    }

    pub fn query_form_mut(&mut self, selector: &Selector) -> Option<&mut FormElement> {
        self.forms.iter_mut().find(|f| selector.matches_form(f))
    }

    /// Error region with the given id, if the page has one.
    pub fn error_region_mut(&mut self, id: &str) -> Option<&mut ErrorRegion> {
        self.error_region.as_mut().filter(|r| r.id == id)
    }
}

impl FormElement {
    /// The submit button, looked up by id inside this form.
    pub fn submit_button_mut(&mut self, id: &str) -> Option<&mut SubmitButton> {
        self.submit_button.as_mut().filter(|b| b.id == id)
    }

    /// Name/value pairs a browser would put into `new FormData(form)`.
    pub fn form_data(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter(|f| !f.disabled)
            .filter(|f| !matches!(f.input_type.as_deref(), Some("submit" | "button" | "reset" | "image")))
            .filter_map(|f| {
                let name = f.name.as_deref().filter(|n| !n.is_empty())?;
                Some((name.to_string(), f.value.clone()))
            })
            .collect()
    }

    /// Set a field's value by name. Returns false when no field has that name.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.name.as_deref() == Some(name)) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Empty every text-entry input and every textarea.
    pub fn clear_text_fields(&mut self) {
        for field in self.fields.iter_mut().filter(|f| f.is_text_entry()) {
            field.value.clear();
        }
    }
}

impl FormField {
    pub fn is_text_entry(&self) -> bool {
        match self.tag {
            FieldTag::Textarea => true,
            FieldTag::Select => false,
            FieldTag::Input => {
                let t = self.input_type.as_deref().unwrap_or("text").to_ascii_lowercase();
                !NON_TEXT_INPUT_TYPES.contains(&t.as_str())
            }
        }
    }
}

impl SubmitButton {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// `classList.remove(from); classList.add(to)`
    pub fn swap_class(&mut self, from: &str, to: &str) {
        self.classes.retain(|c| c != from);
        if !self.has_class(to) {
            self.classes.push(to.to_string());
        }
    }
}
