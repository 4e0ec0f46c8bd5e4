use regex::Regex;

use crate::page::page_model::{FieldTag, FormElement, FormField};

/// Why a field fails constraint validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidityIssue {
    ValueMissing,
    TypeMismatch(String),
    PatternMismatch,
    TooShort(usize),
    TooLong(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidField {
    pub name: Option<String>,
    pub issue: ValidityIssue,
}

/// Equivalent of `form.checkValidity()`.
pub fn check_validity(form: &FormElement) -> bool {
    invalid_fields(form).is_empty()
}

/// Every field that fails constraint validation, in document order.
pub fn invalid_fields(form: &FormElement) -> Vec<InvalidField> {
    form.fields
        .iter()
        .filter(|f| !f.disabled)
        .filter_map(|f| {
            field_issue(f).map(|issue| InvalidField {
                name: f.name.clone(),
                issue,
            })
        })
        .collect()
}

fn field_issue(field: &FormField) -> Option<ValidityIssue> {
    let input_type = field
        .input_type
        .as_deref()
        .unwrap_or("text")
        .to_ascii_lowercase();

    // Hidden and button-like inputs are barred from constraint validation
    if field.tag == FieldTag::Input
        && matches!(input_type.as_str(), "hidden" | "submit" | "button" | "reset" | "image")
    {
        return None;
    }

    let value = field.value.as_str();
    if value.is_empty() {
        return field.required.then_some(ValidityIssue::ValueMissing);
    }

    if field.tag == FieldTag::Input {
        let type_ok = match input_type.as_str() {
            "email" => is_email(value),
            "number" | "range" => value.trim().parse::<f64>().is_ok(),
            "url" => is_absolute_url(value),
            _ => true,
        };
        if !type_ok {
            return Some(ValidityIssue::TypeMismatch(input_type));
        }
    }

    let len = value.chars().count();
    if let Some(min) = field.min_length {
        if len < min {
            return Some(ValidityIssue::TooShort(min));
        }
    }
    if let Some(max) = field.max_length {
        if len > max {
            return Some(ValidityIssue::TooLong(max));
        }
    }

    if field.tag == FieldTag::Input {
        if let Some(pattern) = field.pattern.as_deref() {
            // Browsers ignore patterns that do not compile
            if let Ok(re) = Regex::new(&format!("^(?:{})$", pattern)) {
                if !re.is_match(value) {
                    return Some(ValidityIssue::PatternMismatch);
                }
            }
        }
    }

    None
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

fn is_absolute_url(value: &str) -> bool {
    match value.split_once(':') {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !rest.is_empty()
        }
        None => false,
    }
}
