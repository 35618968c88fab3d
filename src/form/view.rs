use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::{self, Array, Reflect};
use web_sys::{
    Document, Element, FormData, HtmlButtonElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement,
};

use crate::app::SiteController;
use crate::dom;
use crate::error::SiteError;
use crate::form::state::{ContactForm, FormEffect, FormMsg, FormStatus, StatusKind};
use crate::form::validate::{FieldKind, FieldSnapshot};

const STATUS_ID: &str = "formStatus";

/// First id named by an `aria-describedby` attribute.
pub fn error_container_id(described_by: &str) -> Option<&str> {
    described_by.split_whitespace().next()
}

pub fn aria_invalid(message: Option<&str>) -> &'static str {
    if message.is_some() {
        "true"
    } else {
        "false"
    }
}

/// `data-type`, `role` and `aria-live` for the status element.
pub fn status_attributes(kind: StatusKind) -> [(&'static str, &'static str); 3] {
    [
        ("data-type", kind.as_str()),
        ("role", kind.role()),
        ("aria-live", kind.aria_live()),
    ]
}

/// `aria-disabled` value for the submit button, `None` meaning removed.
pub fn busy_aria_disabled(busy: bool) -> Option<&'static str> {
    busy.then_some("true")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMethod {
    Get,
    Post,
}

impl SubmitMethod {
    /// Method named by the form's `method` attribute; anything but `get`
    /// posts.
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw {
            Some(method) if method.trim().eq_ignore_ascii_case("get") => SubmitMethod::Get,
            _ => SubmitMethod::Post,
        }
    }
}

/// `action` with its query replaced by the urlencoded `pairs`, as a browser
/// builds the target of a GET form.
pub fn query_url(action: &str, pairs: &[(String, String)]) -> String {
    let base = action.split('#').next().unwrap_or(action);
    let base = base.split('?').next().unwrap_or(base);
    let query = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, query)
}

/// Text entries of `data`; file entries are skipped.
fn form_pairs(data: &FormData) -> Result<Vec<(String, String)>, SiteError> {
    let Some(entries) = js_sys::try_iter(data)? else {
        return Ok(Vec::new());
    };
    let mut pairs = Vec::new();
    for entry in entries {
        let entry = Array::from(&entry?);
        if let (Some(name), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
            pairs.push((name, value));
        }
    }
    Ok(pairs)
}

fn snapshot(element: &Element) -> FieldSnapshot {
    let tag_name = element.tag_name();
    let kind = FieldKind::from_markup(element.get_attribute("type").as_deref(), &tag_name);
    let required = element.has_attribute("required")
        || element.get_attribute("aria-required").as_deref() == Some("true");
    let mut field = FieldSnapshot::text(&element.id(), kind, "", required);

    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        field.value = input.value();
        field.checked = input.checked();
        field.inactive = input.disabled() || input.read_only();
        field.natively_valid = input.validity().valid();
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        field.value = area.value();
        field.inactive = area.disabled() || area.read_only();
        field.natively_valid = area.validity().valid();
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        field.value = select.value();
        field.inactive = select.disabled();
        field.natively_valid = select.validity().valid();
    }
    field
}

struct FormView {
    document: Document,
    form: HtmlFormElement,
    fields: Vec<Element>,
    submit_button: Option<HtmlButtonElement>,
}

impl FormView {
    fn field(&self, id: &str) -> Option<&Element> {
        self.fields.iter().find(|field| field.id() == id)
    }

    fn annotate(&self, field: &Element, message: Option<&str>) {
        let _ = field.set_attribute("aria-invalid", aria_invalid(message));
        let container = field
            .get_attribute("aria-describedby")
            .and_then(|ids| error_container_id(&ids).and_then(|id| self.document.get_element_by_id(id)));
        if let Some(container) = container {
            container.set_text_content(Some(message.unwrap_or("")));
        }
    }

    fn clear_all(&self) {
        if let Ok(list) = self.form.query_selector_all("[aria-describedby]") {
            for i in 0..list.length() {
                if let Some(field) = list.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                    self.annotate(&field, None);
                }
            }
        }
    }

    fn show_status(&self, status: &FormStatus) {
        let Some(element) = self.document.get_element_by_id(STATUS_ID) else {
            return;
        };
        element.set_text_content(Some(&status.message));
        let _ = element.class_list().add_1("is-visible");
        for (name, value) in status_attributes(status.kind) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn set_busy(&self, busy: bool) {
        let Some(button) = &self.submit_button else {
            return;
        };
        button.set_disabled(busy);
        let _ = match busy_aria_disabled(busy) {
            Some(value) => button.set_attribute("aria-disabled", value),
            None => button.remove_attribute("aria-disabled"),
        };
    }

    fn action(&self) -> String {
        self.form.action()
    }

    fn method(&self) -> SubmitMethod {
        SubmitMethod::from_attribute(self.form.get_attribute("method").as_deref())
    }
}

async fn send(action: String, method: SubmitMethod, body: FormData) -> Result<(), SiteError> {
    let request = match method {
        SubmitMethod::Get => Request::get(&query_url(&action, &form_pairs(&body)?)),
        SubmitMethod::Post => Request::post(&action).body(body),
    };
    let response = request.header("Accept", "application/json").send().await?;
    if !response.ok() {
        return Err(SiteError::Http(response.status()));
    }
    // The body is optional; an empty or non-JSON reply still counts as sent.
    if let Err(e) = response.json::<serde_json::Value>().await {
        debug!("Form response was not JSON: {}", e);
    }
    Ok(())
}

struct FormController {
    state: RefCell<ContactForm>,
    view: FormView,
}

impl FormController {
    fn dispatch(self: &Rc<Self>, msg: FormMsg) {
        let effects = self.state.borrow_mut().update(msg);
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(self: &Rc<Self>, effect: FormEffect) {
        match effect {
            FormEffect::SetFieldError { id, message } => {
                if let Some(field) = self.view.field(&id) {
                    self.view.annotate(field, Some(&message));
                }
            }
            FormEffect::ClearFieldError { id } => {
                if let Some(field) = self.view.field(&id) {
                    self.view.annotate(field, None);
                }
            }
            FormEffect::ClearAllErrors => self.view.clear_all(),
            FormEffect::ShowStatus(status) => self.view.show_status(&status),
            FormEffect::SetSubmitBusy(busy) => self.view.set_busy(busy),
            FormEffect::Send => {
                let result = FormData::new_with_form(&self.view.form);
                let this = Rc::clone(self);
                let (action, method) = (self.view.action(), self.view.method());
                spawn_local(async move {
                    let outcome = match result {
                        Ok(body) => send(action, method, body).await,
                        Err(e) => Err(SiteError::from(e)),
                    };
                    this.dispatch(FormMsg::Settled(outcome));
                });
            }
            FormEffect::NativeSubmit => {
                info!("Fetch unavailable, submitting natively");
                let _ = self.view.form.submit();
            }
            FormEffect::Reset => self.view.form.reset(),
        }
    }
}

fn fetch_available(site: &SiteController) -> bool {
    Reflect::has(&site.window, &JsValue::from_str("fetch")).unwrap_or(false)
}

pub fn init(site: &SiteController) -> Result<(), SiteError> {
    let Some(form) = dom::query(&site.document, ".contact-form")
        .and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
    else {
        debug!("No contact form on this page");
        return Ok(());
    };
    form.set_attribute("novalidate", "true")?;

    let fields: Vec<Element> = site
        .config
        .form
        .field_ids
        .iter()
        .filter_map(|id| form.query_selector(&format!("#{}", id)).ok().flatten())
        .collect();
    let submit_button = form
        .query_selector("button[type=\"submit\"]")
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok());

    let controller = Rc::new(FormController {
        state: RefCell::new(ContactForm::new(
            site.config.form.clone(),
            site.config.messages.clone(),
            site.utils.clone(),
        )),
        view: FormView {
            document: site.document.clone(),
            form: form.clone(),
            fields,
            submit_button,
        },
    });

    for field in &controller.view.fields {
        {
            let controller = Rc::clone(&controller);
            let field_el = field.clone();
            dom::listen(field, "input", move |_| {
                controller.dispatch(FormMsg::Input(snapshot(&field_el)));
            })?;
        }
        let controller = Rc::clone(&controller);
        let field_el = field.clone();
        dom::listen(field, "blur", move |_| {
            controller.dispatch(FormMsg::Blur(snapshot(&field_el)));
        })?;
    }

    let can_fetch = fetch_available(site);
    let submit_controller = Rc::clone(&controller);
    dom::listen(&form, "submit", move |event| {
        event.prevent_default();
        let fields = submit_controller.view.fields.iter().map(snapshot).collect();
        submit_controller.dispatch(FormMsg::Submit { fields, can_fetch });
    })?;

    info!("Contact form ready with {} fields", controller.view.fields.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::{FormMessages, FormRules};
    use crate::utils::Utils;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect()
    }

    #[test]
    fn describedby_uses_first_id() {
        assert_eq!(error_container_id("nombre-error"), Some("nombre-error"));
        assert_eq!(error_container_id("  email-error email-hint"), Some("email-error"));
        assert_eq!(error_container_id("   "), None);
    }

    #[test]
    fn method_attribute() {
        assert_eq!(SubmitMethod::from_attribute(None), SubmitMethod::Post);
        assert_eq!(SubmitMethod::from_attribute(Some("")), SubmitMethod::Post);
        assert_eq!(SubmitMethod::from_attribute(Some("POST")), SubmitMethod::Post);
        assert_eq!(SubmitMethod::from_attribute(Some(" GET ")), SubmitMethod::Get);
        assert_eq!(SubmitMethod::from_attribute(Some("dialog")), SubmitMethod::Post);
    }

    #[test]
    fn get_submission_carries_fields_in_query() {
        let fields = pairs(&[("nombre", "Juana Pérez"), ("email", "juana@estudio.com"), ("mensaje", "a&b=c")]);
        assert_eq!(
            query_url("https://estudio.com/contacto", &fields),
            "https://estudio.com/contacto?nombre=Juana%20P%C3%A9rez&email=juana%40estudio.com&mensaje=a%26b%3Dc"
        );
    }

    #[test]
    fn get_submission_replaces_existing_query_and_fragment() {
        let fields = pairs(&[("nombre", "Jo")]);
        assert_eq!(query_url("/contacto?old=1#form", &fields), "/contacto?nombre=Jo");
        assert_eq!(query_url("/contacto", &[]), "/contacto?");
    }

    #[test]
    fn field_and_button_attributes() {
        assert_eq!(aria_invalid(Some("Este campo es obligatorio")), "true");
        assert_eq!(aria_invalid(None), "false");
        assert_eq!(busy_aria_disabled(true), Some("true"));
        assert_eq!(busy_aria_disabled(false), None);
    }

    #[test]
    fn status_attributes_by_kind() {
        assert_eq!(
            status_attributes(StatusKind::Error),
            [("data-type", "error"), ("role", "alert"), ("aria-live", "assertive")]
        );
        assert_eq!(
            status_attributes(StatusKind::Success),
            [("data-type", "success"), ("role", "status"), ("aria-live", "polite")]
        );
        assert_eq!(
            status_attributes(StatusKind::Info),
            [("data-type", "info"), ("role", "status"), ("aria-live", "polite")]
        );
    }

    #[test]
    fn failed_submit_marks_only_the_invalid_field() {
        let mut form = ContactForm::new(FormRules::default(), FormMessages::default(), Utils::default());
        let fields = vec![
            FieldSnapshot::text("nombre", FieldKind::Other, "Juana Pérez", true),
            FieldSnapshot::text("email", FieldKind::Email, "juana@", true),
            FieldSnapshot::text("servicio", FieldKind::Select, "contable", true),
            FieldSnapshot::text("mensaje", FieldKind::Other, "Quisiera una consulta.", true),
        ];
        let ids: Vec<String> = fields.iter().map(|field| field.id.clone()).collect();

        // Replays the effects the way the controller applies them to the page.
        let mut invalid: BTreeMap<String, &str> = BTreeMap::new();
        let mut status = None;
        for effect in form.update(FormMsg::Submit { fields, can_fetch: true }) {
            match effect {
                FormEffect::ClearAllErrors => {
                    for id in &ids {
                        invalid.insert(id.clone(), aria_invalid(None));
                    }
                }
                FormEffect::SetFieldError { id, message } => {
                    invalid.insert(id, aria_invalid(Some(message.as_str())));
                }
                FormEffect::ClearFieldError { id } => {
                    invalid.insert(id, aria_invalid(None));
                }
                FormEffect::ShowStatus(shown) => status = Some(status_attributes(shown.kind)),
                FormEffect::Send | FormEffect::SetSubmitBusy(_) => panic!("invalid form was sent"),
                _ => {}
            }
        }

        let marked: Vec<&str> = invalid
            .iter()
            .filter(|(_, value)| **value == "true")
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(marked, vec!["email"]);
        assert_eq!(invalid.len(), 4);
        assert_eq!(status.map(|attrs| attrs[1]), Some(("role", "alert")));
    }
}
