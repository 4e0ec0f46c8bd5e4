use crate::mailer::config::{ButtonStyles, Messages};
use crate::page::page_model::{Document, SubmitButton};

pub const DISMISS_BUTTON_HTML: &str =
    r#"<button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button>"#;

/// Write `message` into the error region and make it visible.
///
/// Returns false when the page has no region with `region_id`. Each call
/// replaces whatever the region showed before.
pub fn show_error(document: &mut Document, region_id: &str, message: &str) -> bool {
    let Some(region) = document.error_region_mut(region_id) else {
        return false;
    };
    region.content = format!("{}{}", escape_html(message), DISMISS_BUTTON_HTML);
    region.visible = true;
    true
}

/// Token could not be obtained: the form must not be submittable.
pub fn disable_submit(button: &mut SubmitButton, styles: &ButtonStyles) {
    button.swap_class(&styles.primary, &styles.inactive);
    button.disabled = true;
    button.hidden = true;
}

pub fn mark_sending(button: &mut SubmitButton, messages: &Messages) {
    button.disabled = true;
    button.label = messages.sending_label.clone();
}

pub fn mark_sent(button: &mut SubmitButton, styles: &ButtonStyles, messages: &Messages) {
    button.disabled = true;
    button.swap_class(&styles.primary, &styles.success);
    button.label = messages.success_label.clone();
}

/// Leaves `disabled` untouched.
pub fn mark_failed(button: &mut SubmitButton, styles: &ButtonStyles, messages: &Messages) {
    button.swap_class(&styles.primary, &styles.inactive);
    button.label = messages.error_label.clone();
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
