use std::collections::BTreeMap;

use log::{info, warn};

use crate::config::{FormMessages, FormRules};
use crate::error::SiteError;
use crate::form::validate::{validate_field, FieldKind, FieldSnapshot};
use crate::utils::Utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }

    pub fn role(self) -> &'static str {
        match self {
            StatusKind::Error => "alert",
            _ => "status",
        }
    }

    pub fn aria_live(self) -> &'static str {
        match self {
            StatusKind::Error => "assertive",
            _ => "polite",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormStatus {
    pub message: String,
    pub kind: StatusKind,
}

pub enum FormMsg {
    Input(FieldSnapshot),
    Blur(FieldSnapshot),
    Submit {
        fields: Vec<FieldSnapshot>,
        can_fetch: bool,
    },
    Settled(Result<(), SiteError>),
}

/// DOM work requested by [`ContactForm::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormEffect {
    SetFieldError { id: String, message: String },
    ClearFieldError { id: String },
    ClearAllErrors,
    ShowStatus(FormStatus),
    SetSubmitBusy(bool),
    Send,
    NativeSubmit,
    Reset,
}

pub struct ContactForm {
    rules: FormRules,
    messages: FormMessages,
    utils: Utils,
    errors: BTreeMap<String, String>,
    in_flight: bool,
}

impl ContactForm {
    pub fn new(rules: FormRules, messages: FormMessages, utils: Utils) -> Self {
        Self {
            rules,
            messages,
            utils,
            errors: BTreeMap::new(),
            in_flight: false,
        }
    }

    pub fn update(&mut self, msg: FormMsg) -> Vec<FormEffect> {
        match msg {
            FormMsg::Input(field) => {
                let now_valid = match field.kind {
                    FieldKind::Checkbox => field.checked,
                    _ => field.natively_valid,
                };
                if now_valid {
                    vec![self.clear(&field.id)]
                } else {
                    Vec::new()
                }
            }
            FormMsg::Blur(field) => vec![self.check(&field)],
            FormMsg::Submit { fields, can_fetch } => self.submit(&fields, can_fetch),
            FormMsg::Settled(result) => {
                self.in_flight = false;
                let mut effects = match result {
                    Ok(()) => {
                        info!("Contact form sent");
                        self.errors.clear();
                        vec![
                            self.status(self.messages.sent.clone(), StatusKind::Success),
                            FormEffect::ClearAllErrors,
                            FormEffect::Reset,
                        ]
                    }
                    Err(e) => {
                        warn!("Contact form submission failed: {}", e);
                        vec![self.status(self.messages.send_failed.clone(), StatusKind::Error)]
                    }
                };
                effects.push(FormEffect::SetSubmitBusy(false));
                effects
            }
        }
    }

    fn submit(&mut self, fields: &[FieldSnapshot], can_fetch: bool) -> Vec<FormEffect> {
        if self.in_flight {
            warn!("Submission already in progress, ignoring");
            return Vec::new();
        }

        self.errors.clear();
        let mut effects = vec![FormEffect::ClearAllErrors];
        effects.extend(fields.iter().map(|field| self.check(field)));

        if !self.errors.is_empty() {
            effects.push(self.status(self.messages.fix_fields.clone(), StatusKind::Error));
            return effects;
        }

        effects.push(self.status(self.messages.sending.clone(), StatusKind::Info));
        if can_fetch {
            self.in_flight = true;
            effects.push(FormEffect::SetSubmitBusy(true));
            effects.push(FormEffect::Send);
        } else {
            effects.push(FormEffect::NativeSubmit);
        }
        effects
    }

    fn check(&mut self, field: &FieldSnapshot) -> FormEffect {
        let message = validate_field(field, &self.rules, &self.messages, &self.utils);
        if message.is_empty() {
            self.clear(&field.id)
        } else {
            self.errors.insert(field.id.clone(), message.clone());
            FormEffect::SetFieldError {
                id: field.id.clone(),
                message,
            }
        }
    }

    fn clear(&mut self, id: &str) -> FormEffect {
        self.errors.remove(id);
        FormEffect::ClearFieldError { id: id.to_string() }
    }

    fn status(&self, message: String, kind: StatusKind) -> FormEffect {
        FormEffect::ShowStatus(FormStatus { message, kind })
    }
}
