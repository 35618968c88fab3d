use crate::config::{FormMessages, FormRules};
use crate::utils::Utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Checkbox,
    Select,
    Email,
    Tel,
    Other,
}

impl FieldKind {
    /// Kind from the `type` attribute, falling back to the tag name.
    pub fn from_markup(type_attr: Option<&str>, tag_name: &str) -> Self {
        let kind = type_attr
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| tag_name.to_ascii_lowercase());
        match kind.as_str() {
            "checkbox" => FieldKind::Checkbox,
            "email" => FieldKind::Email,
            "tel" => FieldKind::Tel,
            _ if tag_name.eq_ignore_ascii_case("select") => FieldKind::Select,
            _ => FieldKind::Other,
        }
    }
}

/// What the validator needs to know about a field at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnapshot {
    pub id: String,
    pub kind: FieldKind,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    /// Disabled or read-only.
    pub inactive: bool,
    /// The browser's own constraint validation verdict.
    pub natively_valid: bool,
}

impl FieldSnapshot {
    pub fn text(id: &str, kind: FieldKind, value: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            kind,
            value: value.to_string(),
            checked: false,
            required,
            inactive: false,
            natively_valid: true,
        }
    }

    #[cfg(test)]
    pub fn checkbox(id: &str, checked: bool, required: bool) -> Self {
        Self {
            checked,
            ..Self::text(id, FieldKind::Checkbox, "", required)
        }
    }
}

pub fn digit_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Error message for `field`, empty when the field is valid.
pub fn validate_field(
    field: &FieldSnapshot,
    rules: &FormRules,
    messages: &FormMessages,
    utils: &Utils,
) -> String {
    if field.inactive {
        return String::new();
    }

    let blank = field.value.trim().is_empty();
    let message = match field.kind {
        FieldKind::Checkbox if field.required && !field.checked => &messages.required,
        FieldKind::Checkbox => return String::new(),
        FieldKind::Select if field.required && blank => &messages.select_required,
        FieldKind::Select => return String::new(),
        _ if field.required && blank => &messages.required,
        _ if field.value.is_empty() => return String::new(),
        FieldKind::Email if !utils.validate_email(&field.value) => &messages.invalid_email,
        FieldKind::Email => return String::new(),
        FieldKind::Tel if digit_count(&field.value) < rules.min_phone_digits => &messages.invalid_phone,
        FieldKind::Tel => return String::new(),
        _ => match rules.min_length_for(&field.id) {
            Some(min) if field.value.trim().chars().count() < min.chars => &min.message,
            _ => return String::new(),
        },
    };
    message.clone()
}
