use std::fmt;

use crate::mailer::error::MailerError;
use crate::page::page_model::FormElement;

/// A single compound CSS selector: `form`, `#contact`, `form.mail`,
/// `form#contact.mail`, `[name="contact"]`.
///
/// Combinators and pseudo-classes are rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub name: Option<String>,
    source: String,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, MailerError> {
        let source = input.trim();
        let invalid = |reason: &str| MailerError::Selector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        if source.is_empty() {
            return Err(invalid("empty selector"));
        }
        if source.chars().any(|c| c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',' | ':')) {
            return Err(invalid("only single compound selectors are supported"));
        }

        let mut selector = Selector {
            source: source.to_string(),
            ..Default::default()
        };

        let mut rest = source;
        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            let tag = &rest[..tag_end];
            if tag != "*" {
                selector.tag = Some(tag.to_ascii_lowercase());
            }
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let ident = &body[..end];
                    if ident.is_empty() {
                        return Err(invalid("missing identifier after '#' or '.'"));
                    }
                    if first == '#' {
                        if selector.id.is_some() {
                            return Err(invalid("more than one id"));
                        }
                        selector.id = Some(ident.to_string());
                    } else {
                        selector.classes.push(ident.to_string());
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(|| invalid("unterminated attribute selector"))?;
                    let attr = &rest[1..close];
                    let (key, value) = attr
                        .split_once('=')
                        .ok_or_else(|| invalid("attribute selector needs a value"))?;
                    if key.trim() != "name" {
                        return Err(invalid("only [name=...] attribute selectors are supported"));
                    }
                    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                    selector.name = Some(value.to_string());
                    rest = &rest[close + 1..];
                }
                _ => return Err(invalid("unexpected character")),
            }
        }

        Ok(selector)
    }

    pub fn matches_form(&self, form: &FormElement) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "form" {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if form.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if form.name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| form.classes.iter().any(|fc| fc == c))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
