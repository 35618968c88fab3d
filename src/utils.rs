use once_cell::sync::Lazy;
use regex::Regex;
use wasm_bindgen::prelude::*;
use web_sys::js_sys::{Array, Date, Function, Intl, Object, Reflect};

use crate::error::SiteError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

// Argentine numbers, with or without country prefix.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+54|54)?[\s-]?([0-9]{2,4})[\s-]?([0-9]{6,8})$").expect("phone pattern compiles")
});

pub const DEFAULT_LOCALE: &str = "es-AR";

/// Small helper namespace handed to the components that need it.
#[derive(Debug, Clone, PartialEq)]
pub struct Utils {
    locale: String,
}

impl Default for Utils {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl Utils {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    pub fn validate_email(&self, email: &str) -> bool {
        EMAIL_RE.is_match(email)
    }

    pub fn validate_phone(&self, phone: &str) -> bool {
        PHONE_RE.is_match(phone)
    }

    pub fn format_number(&self, num: f64) -> Result<String, SiteError> {
        let formatter = Intl::NumberFormat::new(&self.locales(), &Object::new());
        call_formatter(formatter.format(), &JsValue::from_f64(num))
    }

    /// Long-form date, e.g. "17 de octubre de 2026" for `es-AR`.
    pub fn format_date(&self, date: &str) -> Result<String, SiteError> {
        let options = Object::new();
        for (key, value) in [("year", "numeric"), ("month", "long"), ("day", "numeric")] {
            Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_str(value))?;
        }
        let formatter = Intl::DateTimeFormat::new(&self.locales(), &options);
        let parsed = Date::new(&JsValue::from_str(date));
        call_formatter(formatter.format(), &parsed)
    }

    fn locales(&self) -> Array {
        Array::of1(&JsValue::from_str(&self.locale))
    }
}

fn call_formatter(format: Function, value: &JsValue) -> Result<String, SiteError> {
    format
        .call1(&JsValue::NULL, value)?
        .as_string()
        .ok_or_else(|| SiteError::Js("formatter returned a non-string".to_string()))
}

// Exposed to page scripts so inline snippets can share the same helpers.

#[wasm_bindgen(js_name = validateEmail)]
pub fn validate_email(email: &str) -> bool {
    Utils::default().validate_email(email)
}

#[wasm_bindgen(js_name = validatePhone)]
pub fn validate_phone(phone: &str) -> bool {
    Utils::default().validate_phone(phone)
}

#[wasm_bindgen(js_name = formatNumber)]
pub fn format_number(num: f64) -> Result<String, JsValue> {
    Utils::default()
        .format_number(num)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(date: &str) -> Result<String, JsValue> {
    Utils::default()
        .format_date(date)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
