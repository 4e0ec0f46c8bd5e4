use js_mailer_client::{
    mailer::config::MailerConfig,
    page::page_model::{Document, ErrorRegion, FieldTag, FormElement, FormField, SubmitButton},
};

pub const BASE: &str = "https://mailer.test";

pub const TOKEN_OK: &str = r#"{
    "success": true,
    "status_code": 201,
    "status": "Created",
    "message": "sender token successfully created",
    "data": {
        "url": "/x",
        "method": "post",
        "enc_type": "multipart/form-data"
    }
}"#;

pub fn field(tag: FieldTag, name: &str, input_type: Option<&str>, value: &str, required: bool) -> FormField {
    FormField {
        tag,
        name: Some(name.into()),
        input_type: input_type.map(Into::into),
        value: value.into(),
        required,
        disabled: false,
        pattern: None,
        min_length: None,
        max_length: None,
    }
}

/// Contact page: name, email, message, a hidden honeypot and a submit button.
pub fn contact_page() -> Document {
    Document {
        title: "Contact".into(),
        forms: vec![FormElement {
            id: Some("contact".into()),
            name: None,
            classes: vec!["mail-form".into()],
            action: "#".into(),
            method: "get".into(),
            enctype: "application/x-www-form-urlencoded".into(),
            fields: vec![
                field(FieldTag::Input, "name", Some("text"), "Jane Doe", true),
                field(FieldTag::Input, "email", Some("email"), "jane@example.com", true),
                field(FieldTag::Textarea, "message", None, "Hello there", true),
                field(FieldTag::Input, "source", Some("hidden"), "website", false),
            ],
            submit_button: Some(SubmitButton {
                id: "submitButton".into(),
                label: "Send".into(),
                disabled: false,
                hidden: false,
                classes: vec!["btn".into(), "btn-primary".into()],
            }),
        }],
        error_region: Some(ErrorRegion {
            id: "errorMsg".into(),
            content: String::new(),
            visible: false,
        }),
    }
}

pub fn mailer_config() -> MailerConfig {
    MailerConfig {
        base_url: BASE.into(),
        has_form: true,
        form_id: Some("contact_form".into()),
        form_selector: Some("#contact".into()),
        ..MailerConfig::default()
    }
}

pub fn temp_path(name: &str) -> String {
    let path = std::env::temp_dir().join(format!("js-mailer-client-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_file(&path);
    path.display().to_string()
}
